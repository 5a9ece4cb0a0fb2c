use std::{
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use tima::motion::{MotionAnalyzer, MotionSample};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MotionEventKind {
    Walking,
    BreakGesture,
    AutoOff,
}

#[derive(Clone, Copy)]
struct MotionEvent {
    ms: i64,
    kind: MotionEventKind,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;
    let mut idle_timeout_ms: Option<i64> = None;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "--idle-timeout-ms" => {
                idx += 1;
                let Some(raw) = args.get(idx) else {
                    return Err("missing value after --idle-timeout-ms".into());
                };
                let timeout = raw
                    .parse::<i64>()
                    .map_err(|e| format!("invalid --idle-timeout-ms '{raw}': {e}"))?;
                idle_timeout_ms = Some(timeout);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    let samples = parse_trace(&trace_path)?;

    let mut analyzer = match idle_timeout_ms {
        Some(timeout) => MotionAnalyzer::with_idle_timeout_ms(timeout),
        None => MotionAnalyzer::new(),
    };
    let mut events: Vec<MotionEvent> = Vec::new();
    let mut idle = false;
    for sample in &samples {
        let verdict = analyzer.analyze(*sample);
        if verdict.walking {
            events.push(MotionEvent {
                ms: sample.timestamp_ms,
                kind: MotionEventKind::Walking,
            });
        }
        if verdict.break_gesture {
            events.push(MotionEvent {
                ms: sample.timestamp_ms,
                kind: MotionEventKind::BreakGesture,
            });
        }
        // Auto-off is reported on its rising edge only.
        if verdict.auto_off && !idle {
            events.push(MotionEvent {
                ms: sample.timestamp_ms,
                kind: MotionEventKind::AutoOff,
            });
        }
        idle = verdict.auto_off;
    }

    println!("event,ms,kind");
    for event in &events {
        println!("event,{},{}", event.ms, kind_label(event.kind));
    }

    if let Some(expect_path) = expect_path {
        let expected = parse_expected_kinds(&expect_path)?;
        let actual: Vec<&'static str> = events.iter().map(|e| kind_label(e.kind)).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            return Err("event sequence mismatch".into());
        }
    }

    Ok(())
}

fn usage() -> String {
    "usage: motion_replay <trace.csv> [--idle-timeout-ms N] [--expect expected_kinds.txt]"
        .to_string()
}

/// Accepts `motion_trace,ms,magnitude` rows or raw `motion_trace,ms,x,y,z`
/// accelerometer rows in g.
fn parse_trace(path: &Path) -> Result<Vec<MotionSample>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out: Vec<MotionSample> = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts[0] != "motion_trace" {
            continue;
        }
        if parts.get(1) == Some(&"ms") {
            continue;
        }

        let sample = match parts.len() {
            3 => MotionSample::new(
                parse_f32(parts[2], path, line_no, "magnitude")?,
                parse_i64(parts[1], path, line_no, "ms")?,
            ),
            5 => MotionSample::from_axes(
                parse_f32(parts[2], path, line_no, "x")?,
                parse_f32(parts[3], path, line_no, "y")?,
                parse_f32(parts[4], path, line_no, "z")?,
                parse_i64(parts[1], path, line_no, "ms")?,
            ),
            _ => {
                return Err(format!(
                    "{}:{} invalid trace line, expected 3 or 5 columns",
                    path.display(),
                    line_no
                ))
            }
        };
        out.push(sample);
    }

    Ok(out)
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        let normalized = normalize_kind(token).ok_or_else(|| {
            format!(
                "{}:{} invalid expected event kind: {}",
                path.display(),
                line_no,
                token
            )
        })?;
        kinds.push(normalized);
    }

    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<&'static str> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "walking" => Some("walking"),
        "break_gesture" | "gesture" => Some("break_gesture"),
        "auto_off" => Some("auto_off"),
        _ => None,
    }
}

fn kind_label(kind: MotionEventKind) -> &'static str {
    match kind {
        MotionEventKind::Walking => "walking",
        MotionEventKind::BreakGesture => "break_gesture",
        MotionEventKind::AutoOff => "auto_off",
    }
}

fn parse_i64(raw: &str, path: &Path, line_no: usize, field: &str) -> Result<i64, String> {
    raw.parse::<i64>().map_err(|e| {
        format!(
            "{}:{} invalid {} '{}': {}",
            path.display(),
            line_no,
            field,
            raw,
            e
        )
    })
}

fn parse_f32(raw: &str, path: &Path, line_no: usize, field: &str) -> Result<f32, String> {
    raw.parse::<f32>().map_err(|e| {
        format!(
            "{}:{} invalid {} '{}': {}",
            path.display(),
            line_no,
            field,
            raw,
            e
        )
    })
}
