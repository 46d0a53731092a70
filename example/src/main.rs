// example/src/main.rs

use idlgate::{Bridge, CompileError};
use serde_json::json;

const TRACKS_IDL: &str = r#"
    struct Position {
        double latitude;
        double longitude;
        short altitude;
    };

    struct Track {
        string id;
        Position position;
        octet quality;
        sequence<string> tags;
    };
"#;

fn main() -> Result<(), CompileError> {
    let bridge = Bridge::from_source(TRACKS_IDL)?;

    println!("topics: {:?}", bridge.list_topics());
    println!(
        "canonical document:\n{}",
        serde_json::to_string_pretty(&bridge.schema_document()).unwrap()
    );

    // A payload that satisfies the Track schema end to end.
    let good = json!({
        "id": "t-42",
        "position": { "latitude": 48.85, "longitude": 2.35, "altitude": 120 },
        "quality": 200,
        "tags": ["radar", "fused"],
    });
    match bridge.validate("Track", &good) {
        Ok(value) => println!("validated: {}", value.to_json()),
        Err(violations) => println!("unexpected violations: {:?}", violations),
    }

    // Three problems at once: quality out of range, altitude not a number,
    // and the id field missing. All three come back in one report.
    let bad = json!({
        "position": { "latitude": 48.85, "longitude": 2.35, "altitude": "high" },
        "quality": 300,
        "tags": [],
    });
    match bridge.validate("Track", &bad) {
        Ok(_) => println!("unexpectedly valid"),
        Err(violations) => {
            println!("violations:");
            for violation in &violations {
                println!("  - {}", violation);
            }
        }
    }

    Ok(())
}
