use clap::Parser;
use log::info;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::{Path, PathBuf};

use tapline::{Filter, TapSet};

#[derive(Parser, Debug)]
#[command(name = "filter_wav")]
#[command(about = "Run a WAV file through an FIR tap set", long_about = None)]
struct Args {
    /// WAV file to filter (stereo input uses the left channel)
    input: PathBuf,

    /// Tap set file (TOML with `taps = [...]` and optional `gain`)
    #[arg(short = 't', long)]
    taps: PathBuf,

    /// Output WAV file (32-bit float, mono)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Override the gain from the tap set file
    #[arg(short = 'g', long)]
    gain: Option<f32>,

    /// Output format: text, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct LevelSummary {
    rms: f32,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl LevelSummary {
    fn from_samples(samples: &[f32]) -> Self {
        let mut stats: Stats<f32> = Stats::new();
        let mut sum_squares = 0.0f64;
        for &s in samples {
            stats.update(s);
            sum_squares += (s as f64) * (s as f64);
        }
        let rms = (sum_squares / samples.len().max(1) as f64).sqrt() as f32;
        Self {
            rms,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct FilterReport {
    filename: String,
    sample_rate: u32,
    sample_count: usize,
    num_taps: usize,
    gain: f32,
    dc_sum: f32,
    group_delay_samples: usize,
    input: LevelSummary,
    output: LevelSummary,
}

/// Instantiate the const-generic engine for the tap count found in the
/// file. Offline design tools in this codebase emit odd lengths from this
/// list; anything else is rejected up front.
macro_rules! filter_for_tap_count {
    ($set:expr, [$($n:literal),* $(,)?]) => {
        match $set.num_taps() {
            $( $n => Box::new($set.build_filter::<$n>()?) as Box<dyn Filter>, )*
            other => anyhow::bail!(
                "unsupported tap count {} (supported: {})",
                other,
                stringify!($($n),*)
            ),
        }
    };
}

fn build_filter(set: &TapSet) -> anyhow::Result<Box<dyn Filter>> {
    let filter = filter_for_tap_count!(
        set,
        [1, 3, 5, 7, 9, 11, 15, 21, 31, 41, 63, 127, 255]
    );
    Ok(filter)
}

fn read_mono(path: &Path) -> anyhow::Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(channels)
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    Ok((samples, spec.sample_rate))
}

fn write_mono(path: &Path, samples: &[f32], sample_rate: u32) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

fn print_text(report: &FilterReport) {
    println!("File:        {}", report.filename);
    println!(
        "Samples:     {} @ {} Hz",
        report.sample_count, report.sample_rate
    );
    println!(
        "Filter:      {} taps, gain {:.4}, DC sum {:.4}, group delay {} samples",
        report.num_taps, report.gain, report.dc_sum, report.group_delay_samples
    );
    println!(
        "Input:       rms {:.4}  mean {:.4}  std {:.4}  min {:.4}  max {:.4}",
        report.input.rms,
        report.input.mean,
        report.input.std_dev,
        report.input.min,
        report.input.max
    );
    println!(
        "Output:      rms {:.4}  mean {:.4}  std {:.4}  min {:.4}  max {:.4}",
        report.output.rms,
        report.output.mean,
        report.output.std_dev,
        report.output.min,
        report.output.max
    );
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut set = TapSet::load(&args.taps)?;
    if let Some(gain) = args.gain {
        set.gain = gain;
    }
    info!(
        "loaded {} taps from {} (gain {:.4})",
        set.num_taps(),
        args.taps.display(),
        set.gain
    );

    let (input, sample_rate) = read_mono(&args.input)?;
    info!(
        "read {} samples @ {} Hz from {}",
        input.len(),
        sample_rate,
        args.input.display()
    );

    let mut filter = build_filter(&set)?;
    let mut output = input.clone();
    filter.process_buffer(&mut output);

    if let Some(ref out_path) = args.output {
        write_mono(out_path, &output, sample_rate)?;
        info!("wrote filtered audio to {}", out_path.display());
    }

    let report = FilterReport {
        filename: args
            .input
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| args.input.display().to_string()),
        sample_rate,
        sample_count: input.len(),
        num_taps: set.num_taps(),
        gain: set.gain,
        dc_sum: set.dc_sum(),
        group_delay_samples: (set.num_taps() - 1) / 2,
        input: LevelSummary::from_samples(&input),
        output: LevelSummary::from_samples(&output),
    };

    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
