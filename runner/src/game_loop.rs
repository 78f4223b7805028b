use std::time::{Duration, Instant};

// Fixed timestep loop, see https://gafferongames.com/post/fix_your_timestep/

pub trait Simulation {
    fn update(&mut self, time: &LoopTime) -> anyhow::Result<()>;

    fn should_exit(&self) -> bool {
        false
    }
}

pub struct GameLoopConfig {
    pub updates_per_s: u32,
    pub max_frame_time_s: f64,
}

pub struct GameLoop<S: Simulation> {
    pub simulation: S,

    previous_instant: Instant,
    accumulated_time_s: f64,
    fixed_time_step_s: f64,
    number_of_updates: u64,
    running_time_s: f64,
    max_frame_time_s: f64,
}

impl<S: Simulation> GameLoop<S> {
    pub fn new(simulation: S, config: GameLoopConfig) -> Self {
        Self {
            simulation,

            previous_instant: Instant::now(),
            accumulated_time_s: 0.0,
            fixed_time_step_s: 1.0 / config.updates_per_s.max(1) as f64,
            number_of_updates: 0,
            running_time_s: 0.0,
            max_frame_time_s: config.max_frame_time_s,
        }
    }

    /// Runs as many fixed updates as the elapsed time calls for.
    pub fn next_frame(&mut self) -> anyhow::Result<GameLoopResult> {
        if self.simulation.should_exit() {
            return Ok(GameLoopResult::Exit);
        }

        let now = Instant::now();
        let elapsed_s = now
            .duration_since(self.previous_instant)
            .as_secs_f64()
            .min(self.max_frame_time_s);
        self.previous_instant = now;

        self.accumulated_time_s += elapsed_s;

        while self.accumulated_time_s >= self.fixed_time_step_s {
            self.running_time_s += self.fixed_time_step_s;
            let time = LoopTime {
                delta_time_s: self.fixed_time_step_s,
                elapsed_time_s: self.running_time_s,
            };
            self.simulation.update(&time)?;
            self.accumulated_time_s -= self.fixed_time_step_s;
            self.number_of_updates += 1;
        }

        Ok(GameLoopResult::Continue)
    }

    /// Time until the next fixed update is due.
    pub fn time_until_next_update(&self) -> Duration {
        Duration::from_secs_f64((self.fixed_time_step_s - self.accumulated_time_s).max(0.0))
    }

    pub fn running_time_s(&self) -> f64 {
        self.running_time_s
    }

    pub fn number_of_updates(&self) -> u64 {
        self.number_of_updates
    }
}

pub enum GameLoopResult {
    Continue,
    Exit,
}

pub struct LoopTime {
    pub delta_time_s: f64,
    pub elapsed_time_s: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountUpdates {
        updates: u32,
        exit_after: u32,
    }

    impl Simulation for CountUpdates {
        fn update(&mut self, time: &LoopTime) -> anyhow::Result<()> {
            assert!(time.delta_time_s > 0.0);
            self.updates += 1;
            Ok(())
        }

        fn should_exit(&self) -> bool {
            self.updates >= self.exit_after
        }
    }

    #[test]
    fn test_runs_fixed_updates_until_exit() {
        let mut game_loop = GameLoop::new(
            CountUpdates {
                updates: 0,
                exit_after: 3,
            },
            GameLoopConfig {
                updates_per_s: 1000,
                max_frame_time_s: 0.25,
            },
        );

        loop {
            std::thread::sleep(game_loop.time_until_next_update());
            if let GameLoopResult::Exit = game_loop.next_frame().unwrap() {
                break;
            }
        }

        assert!(game_loop.number_of_updates() >= 3);
        assert_eq!(
            game_loop.number_of_updates(),
            game_loop.simulation.updates as u64
        );
        assert!(game_loop.running_time_s() > 0.0);
    }
}
