use speedsign::{CircleDetector, CircleRansacConfig};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <edges.png> [max_radius] [out.json]", args[0]);
        std::process::exit(2);
    }

    let edges = image::open(&args[1])?.to_luma8();
    let mut config = CircleRansacConfig::default();
    if let Some(max_radius) = args.get(2) {
        config.max_radius = max_radius.parse()?;
    }

    let detector = CircleDetector::with_config(config);
    let search = detector.search(&edges);

    match &search.detection {
        Some(det) => println!(
            "Circle at ({}, {}) r={} confidence={:.2} (trial {})",
            det.circle.center.x,
            det.circle.center.y,
            det.circle.radius,
            det.confidence,
            det.trial
        ),
        None => println!(
            "No circle after {} trials ({:?}).",
            search.stats.trials, search.failure
        ),
    }

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&search)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
