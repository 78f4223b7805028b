use glam::{IVec3, Vec3};

/// One of the six axis-aligned directions of a block or chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// Y+
    Top = 0,
    /// Y-
    Bottom,
    /// X-
    Left,
    /// X+
    Right,
    /// Z-
    Front,
    /// Z+
    Back,
}

impl Default for Face {
    fn default() -> Self {
        Face::Top
    }
}

impl Face {
    pub fn to_ivec3(&self) -> IVec3 {
        match self {
            Face::Top => IVec3::Y,
            Face::Bottom => -IVec3::Y,
            Face::Left => -IVec3::X,
            Face::Right => IVec3::X,
            Face::Front => -IVec3::Z,
            Face::Back => IVec3::Z,
        }
    }

    pub fn to_vec3(&self) -> Vec3 {
        self.to_ivec3().as_vec3()
    }

    pub fn all() -> [Face; 6] {
        [
            Face::Top,
            Face::Bottom,
            Face::Left,
            Face::Right,
            Face::Front,
            Face::Back,
        ]
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }

    /// Picks the face whose direction is closest to `normal`, using its dominant axis.
    /// Returns `None` for a zero or non-finite vector.
    pub fn from_normal(normal: Vec3) -> Option<Face> {
        if !normal.is_finite() || normal == Vec3::ZERO {
            return None;
        }

        let abs = normal.abs();
        let face = if abs.x >= abs.y && abs.x >= abs.z {
            if normal.x > 0.0 { Face::Right } else { Face::Left }
        } else if abs.y >= abs.z {
            if normal.y > 0.0 { Face::Top } else { Face::Bottom }
        } else if normal.z > 0.0 {
            Face::Back
        } else {
            Face::Front
        };

        Some(face)
    }
}

impl TryFrom<u8> for Face {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::all().get(value as usize).copied().ok_or(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_faces_cancel_out() {
        for face in Face::all() {
            assert_eq!(face.to_ivec3() + face.opposite().to_ivec3(), IVec3::ZERO);
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn test_from_normal() {
        for face in Face::all() {
            assert_eq!(Face::from_normal(face.to_vec3()), Some(face));
        }

        assert_eq!(
            Face::from_normal(Vec3::new(0.2, -0.9, 0.1)),
            Some(Face::Bottom)
        );
        assert_eq!(Face::from_normal(Vec3::ZERO), None);
        assert_eq!(Face::from_normal(Vec3::NAN), None);
    }
}
