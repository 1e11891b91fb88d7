// Pixel comparison CLI for bitmap-raster.
//
// Usage:
//   pixel-compare render <scene> <width> <height> [-o <output.bmp>]
//   pixel-compare compare <file_a> <file_b> [-d <diff.bmp>] [-s <sidebyside.bmp>]
//   pixel-compare list

use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};
use log::{error, info};
use pixel_compare::scenes::{available_scenes, render_scene};
use pixel_compare::{compare_bitmaps, diff_image, load_image, save_image, side_by_side};

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(2);
    }

    let outcome = match args[1].as_str() {
        "render" => cmd_render(&args[2..]).map(|()| true),
        "compare" => cmd_compare(&args[2..]),
        "list" => {
            cmd_list();
            Ok(true)
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            process::exit(2);
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            process::exit(2);
        }
    }
}

/// Honors `RUST_LOG`, defaulting to `info`.
fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.init();
}

fn print_usage() {
    eprintln!("pixel-compare: render reference scenes and compare images");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  render <scene> <width> <height> [-o <output.bmp>]");
    eprintln!("      Render a scene to an image file.");
    eprintln!();
    eprintln!("  compare <file_a> <file_b> [-d <diff.bmp>] [-s <sidebyside.bmp>]");
    eprintln!("      Compare two image files pixel by pixel. Exits 1 if they differ.");
    eprintln!();
    eprintln!("  list");
    eprintln!("      List available scene names.");
}

fn cmd_list() {
    println!("Available scenes:");
    for name in available_scenes() {
        println!("  {}", name);
    }
}

/// Value following the flag at `args[i]`.
fn flag_value(args: &[String], i: usize) -> Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} needs a value", args[i]))
}

fn cmd_render(args: &[String]) -> Result<()> {
    if args.len() < 3 {
        bail!("usage: pixel-compare render <scene> <width> <height> [-o <output>]");
    }
    let scene = &args[0];
    let width: i32 = args[1].parse().with_context(|| format!("invalid width {:?}", args[1]))?;
    let height: i32 = args[2].parse().with_context(|| format!("invalid height {:?}", args[2]))?;

    let mut output = None;
    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "-o" => {
                output = Some(flag_value(args, i)?.to_string());
                i += 2;
            }
            other => bail!("unknown option {}", other),
        }
    }
    let output = output.unwrap_or_else(|| format!("{}_{}x{}.bmp", scene, width, height));

    info!("rendering '{}' at {}x{}", scene, width, height);
    let Some(bmp) = render_scene(scene, width, height)? else {
        bail!("unknown scene '{}', use 'list' to see available scenes", scene);
    };
    save_image(Path::new(&output), &bmp)?;
    info!("saved {}", output);
    Ok(())
}

/// Returns whether the images are identical.
fn cmd_compare(args: &[String]) -> Result<bool> {
    if args.len() < 2 {
        bail!("usage: pixel-compare compare <file_a> <file_b> [-d <diff>] [-s <sidebyside>]");
    }
    let (path_a, path_b) = (Path::new(&args[0]), Path::new(&args[1]));

    let mut diff_path = None;
    let mut sbs_path = None;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-d" => diff_path = Some(flag_value(args, i)?),
            "-s" => sbs_path = Some(flag_value(args, i)?),
            other => bail!("unknown option {}", other),
        }
        i += 2;
    }

    let a = load_image(path_a)?;
    let b = load_image(path_b)?;
    let result = compare_bitmaps(&a, &b)?;
    println!("{}", result);

    if let Some(dp) = diff_path {
        save_image(Path::new(dp), &diff_image(&a, &b)?)?;
        info!("diff saved: {}", dp);
    }
    if let Some(sp) = sbs_path {
        save_image(Path::new(sp), &side_by_side(&a, &b)?)?;
        info!("side-by-side saved: {}", sp);
    }

    if !result.identical {
        println!("\nDifference histogram:");
        for (diff, &count) in result.diff_histogram.iter().enumerate() {
            if count > 0 {
                println!("  diff={}: {} channels", diff, count);
            }
        }
    }
    Ok(result.identical)
}
