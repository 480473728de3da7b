use clap::Parser;

use delivery_sim::simulation;

#[derive(Parser)]
#[command(name = "delivery_sim")]
#[command(about = "Headless pizza-delivery network simulation")]
struct Cli {
    /// Number of simulated frames to run
    #[arg(long, default_value = "3600")]
    frames: u32,

    /// Wall-clock seconds fed to the simulation per frame
    #[arg(long, default_value = "0.016666668")]
    delta: f32,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    println!("Running delivery simulation in headless mode...");
    println!("Frames: {}, Delta: {}s", cli.frames, cli.delta);
    println!();

    let mut world = match cli.seed {
        Some(seed) => simulation::SimWorld::create_demo_world_with_seed(seed),
        None => simulation::SimWorld::create_demo_world(),
    };

    println!("Initial state:");
    world.print_summary();
    world.draw_map();
    println!();

    // Frames per simulated second, for periodic summaries
    let frames_per_second = (1.0 / cli.delta).ceil().max(1.0) as u32;

    let mut frame = 0;
    while frame < cli.frames {
        let frames_to_run = frames_per_second.min(cli.frames - frame);

        for _ in 0..frames_to_run {
            frame += 1;
            for report in world.advance(cli.delta) {
                println!(
                    "*** GAME OVER on day {}: score {}, deliveries {} -- session reset ***",
                    report.day, report.score, report.deliveries
                );
            }
        }

        println!(
            "--- After frame {} ({:.1}s simulated time) ---",
            frame,
            frame as f32 * cli.delta
        );
        world.print_summary();
        world.draw_map();
        println!();

        if frame < cli.frames {
            std::thread::sleep(std::time::Duration::from_millis(250));
        }
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
}
