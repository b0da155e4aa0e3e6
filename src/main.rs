//! Noisefield demo - render a configured noise field to a PNG heightmap.
//!
//! A CPU reference tool for eyeballing field variants and comparing seeds:
//! samples a 2D slice of the field over the x/z plane and writes a grayscale
//! image.

use std::time::Instant;

use clap::Parser;
use glam::Vec3;
use image::{GrayImage, Luma};

use noisefield::gradient::{Perlin, Value};
use noisefield::lattice::{Lattice, Open, Tiling};
use noisefield::noise::{Lattice1D, Lattice2D, Lattice3D, Noise};
use noisefield::voronoi::{Voronoi1D, Voronoi2D, Voronoi3D, F1, F2, F2MinusF1};
use noisefield::{Domain, NoiseField, Settings};

#[derive(Parser, Debug)]
#[command(name = "noisefield")]
#[command(about = "Render a procedural noise field to a grayscale PNG heightmap")]
struct Args {
    /// Hash seed
    #[arg(long, default_value_t = 0)]
    seed: i32,

    /// Lattice cells per domain unit
    #[arg(long, default_value_t = 4)]
    frequency: i32,

    /// Fractal octaves (1-6)
    #[arg(long, default_value_t = 1)]
    octaves: i32,

    /// Noise variant: value, perlin, voronoi-f1, voronoi-f2, voronoi-f2f1
    #[arg(long, default_value = "perlin")]
    variant: String,

    /// Sampled dimensions (1, 2 or 3)
    #[arg(long, default_value_t = 2)]
    dimensions: u32,

    /// Wrap cell indices so the field repeats every `frequency` cells
    #[arg(long)]
    tiling: bool,

    /// Domain scale (world units spanned by the image)
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Output image size (width = height)
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// Output file path
    #[arg(long, default_value = "noisefield.png")]
    output: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = Settings::new(args.seed, args.frequency, args.octaves)?;
    let domain = Domain::with_scale(args.scale);

    println!("Noise field renderer");
    println!("  Variant: {} ({}D)", args.variant, args.dimensions);
    println!("  Seed: {}", args.seed);
    println!("  Frequency: {}  Octaves: {}", args.frequency, args.octaves);
    println!("  Tiling: {}", args.tiling);
    println!("  Size: {}x{}", args.size, args.size);

    let start = Instant::now();

    let img = if args.tiling {
        dispatch::<Tiling>(&args, settings, &domain)?
    } else {
        dispatch::<Open>(&args, settings, &domain)?
    };
    img.save(&args.output)?;

    let elapsed = start.elapsed();
    println!("  Output: {}", args.output);
    println!("  Time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    Ok(())
}

/// Resolve the strategy and dimension choice to a concrete evaluator type.
fn dispatch<L: Lattice>(
    args: &Args,
    settings: Settings,
    domain: &Domain,
) -> Result<GrayImage, String> {
    match (args.variant.as_str(), args.dimensions) {
        ("value", 1) => render::<Lattice1D<L, Value>>(args, settings, domain, true),
        ("value", 2) => render::<Lattice2D<L, Value>>(args, settings, domain, true),
        ("value", 3) => render::<Lattice3D<L, Value>>(args, settings, domain, true),
        ("perlin", 1) => render::<Lattice1D<L, Perlin>>(args, settings, domain, true),
        ("perlin", 2) => render::<Lattice2D<L, Perlin>>(args, settings, domain, true),
        ("perlin", 3) => render::<Lattice3D<L, Perlin>>(args, settings, domain, true),
        ("voronoi-f1", 1) => render::<Voronoi1D<L, F1>>(args, settings, domain, false),
        ("voronoi-f1", 2) => render::<Voronoi2D<L, F1>>(args, settings, domain, false),
        ("voronoi-f1", 3) => render::<Voronoi3D<L, F1>>(args, settings, domain, false),
        ("voronoi-f2", 1) => render::<Voronoi1D<L, F2>>(args, settings, domain, false),
        ("voronoi-f2", 2) => render::<Voronoi2D<L, F2>>(args, settings, domain, false),
        ("voronoi-f2", 3) => render::<Voronoi3D<L, F2>>(args, settings, domain, false),
        ("voronoi-f2f1", 1) => render::<Voronoi1D<L, F2MinusF1>>(args, settings, domain, false),
        ("voronoi-f2f1", 2) => render::<Voronoi2D<L, F2MinusF1>>(args, settings, domain, false),
        ("voronoi-f2f1", 3) => render::<Voronoi3D<L, F2MinusF1>>(args, settings, domain, false),
        (variant, dimensions) => Err(format!(
            "unknown variant/dimensions: {} {}D",
            variant, dimensions
        )),
    }
}

/// Sample the field across a unit x/z slice and write one gray pixel per
/// sample. `centered` marks variants with a [-1,1] nominal range; Voronoi
/// variants publish [0,1] directly.
fn render<N: Noise>(
    args: &Args,
    settings: Settings,
    domain: &Domain,
    centered: bool,
) -> Result<GrayImage, String> {
    let field = NoiseField::<N>::new(settings, domain)?;
    let size = args.size;
    let mut img = GrayImage::new(size, size);

    let mut positions = Vec::with_capacity(size as usize);
    let mut values = vec![0.0_f32; size as usize];
    for py in 0..size {
        let z = (py as f32 + 0.5) / size as f32;
        positions.clear();
        positions.extend((0..size).map(|px| Vec3::new((px as f32 + 0.5) / size as f32, 0.0, z)));
        field.fill(&positions, &mut values)?;

        for (px, value) in values.iter().enumerate() {
            let unit = if centered { value * 0.5 + 0.5 } else { *value };
            let gray = (unit * 255.0).clamp(0.0, 255.0) as u8;
            img.put_pixel(px as u32, py, Luma([gray]));
        }
    }

    Ok(img)
}
