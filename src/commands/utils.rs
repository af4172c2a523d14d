use crate::aggregator::calculate_sample_distribution;
use crate::output::read_profile;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a profile JSON file
pub fn validate_profile_file(file_path: PathBuf) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let profile = read_profile(&file_path)?;
    let distribution = calculate_sample_distribution(&profile);

    println!("✓ Valid profile JSON");
    println!("  Version: {}", profile.version);
    println!("  Mode: {}", profile.mode);
    println!("  Samples: {}", profile.overall_samples);
    println!("  Frames: {}", distribution.frame_count);
    println!("  Edges: {}", distribution.edge_count);
    if let Some((id, name, samples)) = &distribution.hottest_frame {
        println!("  Hottest: {} (frame {}, {} samples)", name, id, samples);
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Frameprof Profile Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string           - Schema version (e.g., '1.0')");
        println!("  mode: object              - Sampling mode");
        println!("    kind: string            - cpu | wall | object-allocation");
        println!("    interval|every: number  - Timer interval (usec) or allocation threshold");
        println!("  samples: number           - Samples collected in the run");
        println!("  frames: object            - Frame records keyed by frame id");
        println!("    name: string            - Frame name");
        println!("    location: object?       - Source file and first line");
        println!("    total_samples: number   - Samples in the frame or its callees");
        println!("    samples: number         - Samples in the frame itself");
        println!("    edges: object?          - Callee id -> samples");
        println!("    lines: object?          - Line number -> self samples");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Frameprof v{}", env!("CARGO_PKG_VERSION"));
    println!("Profile Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call-graph reports for sampling profiler runs.");
}
