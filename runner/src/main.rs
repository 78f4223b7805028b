use engine::config::config_manager::Config;

use crate::{
    config::RunnerConfig,
    endless_runner::EndlessRunner,
    game_loop::{GameLoop, GameLoopConfig, GameLoopResult},
};

mod config;
mod endless_runner;
mod game_loop;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();
    log::info!("Starting endless runner...");

    let config = RunnerConfig::create_manager()?.snapshot();
    let updates_per_s = config.updates_per_s;
    let runner = EndlessRunner::new(config)?;

    let mut game_loop = GameLoop::new(
        runner,
        GameLoopConfig {
            updates_per_s,
            max_frame_time_s: 0.25,
        },
    );

    while let GameLoopResult::Continue = game_loop.next_frame()? {
        profiling::finish_frame!();
        std::thread::sleep(game_loop.time_until_next_update());
    }

    log::info!("Ran {} updates", game_loop.number_of_updates());
    game_loop.simulation.shutdown()
}
