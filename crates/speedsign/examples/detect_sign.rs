use speedsign::{PipelineConfig, SignPipeline};
use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};

/// Runs the pipeline over a sequence of frames, spacing them 40 ms apart so
/// the cooldown behaves as on a 25 fps stream.
fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} [--config cfg.json] <frame.png>...", args[0]);
        std::process::exit(2);
    }

    let mut frames = &args[1..];
    let config = if frames.first().map(String::as_str) == Some("--config") && frames.len() > 1 {
        let cfg = PipelineConfig::from_json_file(Path::new(&frames[1]))?;
        frames = &frames[2..];
        cfg
    } else {
        PipelineConfig::default()
    };

    let mut pipeline = SignPipeline::new(config);
    let t0 = Instant::now();
    for (i, path) in frames.iter().enumerate() {
        let mut frame = image::open(path)?.to_rgba8();
        let now = t0 + Duration::from_millis(40 * i as u64);
        let report = pipeline.process_frame(&mut frame, now);
        match (&report.circle, report.decision) {
            (Some(det), Some(decision)) => println!(
                "{path}: circle at ({}, {}) r={} -> {:?}",
                det.circle.center.x, det.circle.center.y, det.circle.radius, decision
            ),
            _ => println!("{path}: no sign"),
        }
    }
    Ok(())
}
