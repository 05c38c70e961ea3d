// ============================================================================
// RetroPaint CLI — headless canvas processing
// ============================================================================
//
// Usage examples:
//   retropaint --input drawing.png --output drawing.bmp
//   retropaint --input drawing.png --share                 (payload to stdout)
//   retropaint --from-share token.txt --output restored.png
//   retropaint --new 640x480 --output blank.png
//
// The GUI shell is a separate collaborator; this binary only exercises the
// engine: decode/encode, share payloads, and canvas resizing.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::io::{export_surface, load_image, SaveFormat};
use crate::session::EditorSession;
use crate::share;

/// RetroPaint headless canvas processor.
///
/// Convert images, produce share payloads, and restore canvases from
/// payloads — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "retropaint",
    about = "RetroPaint headless canvas processor",
    long_about = "Convert images between formats, emit URL-safe share payloads,\n\
                  and restore canvases from payloads without opening the GUI.\n\n\
                  Example:\n  \
                  retropaint --input drawing.png --share\n  \
                  retropaint --from-share token.txt --output restored.png"
)]
pub struct CliArgs {
    /// Input image file (PNG, JPEG, or BMP).
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["from_share", "new"])]
    pub input: Option<PathBuf>,

    /// File containing a share payload to restore the canvas from.
    #[arg(long, value_name = "FILE", conflicts_with = "new")]
    pub from_share: Option<PathBuf>,

    /// Start from a blank canvas of the given size, e.g. "800x600".
    #[arg(long, value_name = "WxH")]
    pub new: Option<String>,

    /// Output file path; format inferred from the extension (png default).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Resize the canvas (copy/crop, white padding), e.g. "400x300".
    #[arg(long, value_name = "WxH")]
    pub resize: Option<String>,

    /// Print the canvas's share payload to stdout.
    #[arg(long)]
    pub share: bool,

    /// Print per-step timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run all CLI processing and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    let start = Instant::now();
    match run_one(&args) {
        Ok(()) => {
            if args.verbose {
                eprintln!("done in {:.0}ms", start.elapsed().as_secs_f64() * 1000.0);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_one(args: &CliArgs) -> Result<(), String> {
    // -- Step 1: build the session -----------------------------------
    let mut session = if let Some(path) = &args.input {
        let image = load_image(path)?;
        let mut s = EditorSession::with_canvas(image.width(), image.height());
        s.load_image(image);
        s
    } else if let Some(path) = &args.from_share {
        let payload = std::fs::read_to_string(path)
            .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
        let decoded =
            share::decode(&payload).map_err(|e| format!("share decode failed: {}", e))?;
        let mut s = EditorSession::default();
        s.apply_share(decoded);
        s
    } else if let Some(geometry) = &args.new {
        let (w, h) = parse_geometry(geometry)?;
        EditorSession::with_canvas(w, h)
    } else {
        return Err("no input given: use --input, --from-share, or --new".to_string());
    };

    if args.verbose {
        eprintln!(
            "canvas: {}x{}",
            session.surface().width(),
            session.surface().height()
        );
    }

    // -- Step 2: optional resize -------------------------------------
    if let Some(geometry) = &args.resize {
        let (w, h) = parse_geometry(geometry)?;
        session.resize_canvas(w, h);
    }

    // -- Step 3: outputs ----------------------------------------------
    if let Some(path) = &args.output {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(SaveFormat::from_extension)
            .unwrap_or(SaveFormat::Png);
        export_surface(session.surface(), path, format)?;
        crate::log_info!("exported {}", path.display());
    }

    if args.share {
        let payload = session
            .share_payload()
            .map_err(|e| format!("share encode failed: {}", e))?;
        println!("{}", payload);
    }

    if args.output.is_none() && !args.share {
        return Err("nothing to do: use --output and/or --share".to_string());
    }

    Ok(())
}

/// Parse "WxH" into dimensions; both must be positive.
fn parse_geometry(geometry: &str) -> Result<(u32, u32), String> {
    let err = || format!("invalid geometry '{}': expected WxH, e.g. 800x600", geometry);
    let (w, h) = geometry.split_once(['x', 'X']).ok_or_else(err)?;
    let w: u32 = w.trim().parse().map_err(|_| err())?;
    let h: u32 = h.trim().parse().map_err(|_| err())?;
    if w == 0 || h == 0 {
        return Err(err());
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_parses_both_separators() {
        assert_eq!(parse_geometry("800x600"), Ok((800, 600)));
        assert_eq!(parse_geometry("64X48"), Ok((64, 48)));
        assert!(parse_geometry("800").is_err());
        assert!(parse_geometry("0x600").is_err());
        assert!(parse_geometry("x").is_err());
    }
}
