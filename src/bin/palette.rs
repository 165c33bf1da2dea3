use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use palette_extract::{
    BarSegment, PaletteConfig, Strategy, Swatch, layout_bar, logger,
    palette_from_bytes, swatches_to_json,
};

/// Extract a color palette from one or more images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Extraction strategy: kmeans, histogram_peaks or colorfullness [default: colorfullness]
    #[arg(short = 's', long)]
    strategy: Option<String>,

    /// Number of colors to extract [default: 6]
    #[arg(short = 'n', long)]
    num_colors: Option<usize>,

    /// Longest side to downscale to before processing [default: 200]
    #[arg(short, long = "resize")]
    resize_to: Option<u32>,

    /// Seed for k-means initialisation [default: 42]
    #[arg(long)]
    seed: Option<u64>,

    /// Hue bins for histogram_peaks [default: 12]
    #[arg(long)]
    h_bins: Option<usize>,

    /// Saturation bins for histogram_peaks [default: 4]
    #[arg(long)]
    s_bins: Option<usize>,

    /// Value bins for histogram_peaks [default: 4]
    #[arg(long)]
    v_bins: Option<usize>,

    /// JSON configuration file; explicit flags take precedence
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Width of the color bar in characters
    #[arg(short, long, default_value_t = 80)]
    width: usize,

    /// Directory to write one <image>.json per input instead of printing JSON
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,
}

impl Args {
    fn palette_config(&self) -> Result<PaletteConfig> {
        let mut config = match &self.config {
            Some(path) => PaletteConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PaletteConfig::default(),
        };

        match (&self.strategy, &self.config) {
            (Some(name), _) => config.strategy = name.parse()?,
            (None, None) => config.strategy = Strategy::Colorfulness,
            (None, Some(_)) => {}
        }
        if let Strategy::HistogramPeaks(bins) = &mut config.strategy {
            bins.h_bins = self.h_bins.unwrap_or(bins.h_bins);
            bins.s_bins = self.s_bins.unwrap_or(bins.s_bins);
            bins.v_bins = self.v_bins.unwrap_or(bins.v_bins);
        }
        if let Some(n) = self.num_colors {
            config.num_colors = n;
        }
        if let Some(r) = self.resize_to {
            config.resize_to = r;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn render_bar(segments: &[BarSegment]) -> String {
    segments
        .iter()
        .map(|s| {
            let [r, g, b] = s.rgb;
            format!("\x1b[38;2;{r};{g};{b}m{}\x1b[0m", "█".repeat(s.cells))
        })
        .collect()
}

fn print_details(swatches: &[Swatch]) {
    for swatch in swatches {
        let [r, g, b] = swatch.rgb();
        println!(
            "RGB: ({r}, {g}, {b})  Hex: {}  Proportion: {:.2}%",
            swatch.hex(),
            swatch.proportion() * 100.0
        );
    }
}

fn main() -> Result<()> {
    logger::init();
    let args = Args::parse();
    let config = args.palette_config()?;
    info!(strategy = %config.strategy, num_colors = config.num_colors, "configuration ready");

    for input in &args.inputs {
        info!("Processing image from path: {}", input.display());
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let swatches = palette_from_bytes(&bytes, &config)
            .with_context(|| format!("extracting palette from {}", input.display()))?;

        println!("\n{}", input.display());
        println!("{}", render_bar(&layout_bar(&swatches, args.width)?));
        print_details(&swatches);

        let json = swatches_to_json(&swatches)?;
        if let Some(dir) = &args.out_dir {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let out_path = dir.join(format!("{stem}.json"));
            fs::create_dir_all(dir)?;
            fs::write(&out_path, json)?;
            println!("Saved → {}", out_path.display());
        } else {
            println!("{json}");
        }
    }

    Ok(())
}
