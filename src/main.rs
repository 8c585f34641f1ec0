use batwalk::{experiment, Config};
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        let program = args.first().map_or("batwalk", String::as_str);
        eprintln!("Usage: {} [config.toml] [output.json]", program);
        eprintln!("Random walk in a room, sensor sampling and slow feature extraction");
        return;
    }

    let config_path = args.get(1).map(String::as_str).unwrap_or("config.toml");
    let mut config = Config::load(config_path);
    if let Some(output) = args.get(2) {
        config.output.path = output.clone();
    }

    let record = match experiment::run(&config) {
        Ok(record) => record,
        Err(e) => {
            log::error!("Experiment failed: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = record.save_to_file(&config.output.path) {
        log::error!("Failed to write {}: {}", config.output.path, e);
        process::exit(1);
    }

    println!("\n=== Experiment Summary ===");
    println!("{}", record.summary());
    println!("Saved to {}", config.output.path);
}
