use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use chromashot::{
    ChromashotError, DEFAULT_MAX_STRIPES, DEFAULT_OUTPUT_HEIGHT, DEFAULT_THUMBNAIL_WIDTH,
    FfmpegLogLevel, ProgressCallback, ProgressInfo, RenderSummary, TimelineOptions,
};

const CLI_AFTER_HELP: &str = "Examples:\n  chromashot input.mp4 timeline.ppm\n  chromashot input.mkv timeline.raw --height 400 --stripes 800 --progress\n  chromashot input.mp4 timeline.png --encode --accurate --log-level error --json";

#[derive(Debug, Parser)]
#[command(
    name = "chromashot",
    version,
    about = "Render a video's color evolution as a timeline barcode image",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input media path.
    input: PathBuf,

    /// Output path. Written as binary PPM whatever the extension.
    output: PathBuf,

    /// Output image height in pixels.
    #[arg(long, default_value_t = DEFAULT_OUTPUT_HEIGHT)]
    height: u32,

    /// Maximum number of stripes (output width).
    #[arg(long, default_value_t = DEFAULT_MAX_STRIPES)]
    stripes: u32,

    /// Width sampled frames are scaled to before reduction.
    #[arg(long, default_value_t = DEFAULT_THUMBNAIL_WIDTH)]
    thumbnail_width: u32,

    /// Run the decoder's loop filter and IDCT (slower, exact frame colors).
    #[arg(long)]
    accurate: bool,

    /// Encode the output by its extension (.png, .jpg, ...) instead of PPM.
    #[arg(long)]
    encode: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Show debug logging.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, value_parser = clap::value_parser!(FfmpegLogLevel))]
    log_level: Option<FfmpegLogLevel>,

    /// Print a JSON summary of the render to stdout.
    #[arg(long)]
    json: bool,
}

struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Result<Self, indicatif::style::TemplateError> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} stripes {msg}",
        )?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            self.bar.set_length(total);
        }
        self.bar.set_position(info.current);
        if let Some(frame) = info.current_frame {
            self.bar.set_message(format!("frame {frame}"));
        }
    }
}

fn timeline_options(cli: &Cli, progress: Option<Arc<BarProgress>>) -> TimelineOptions {
    let mut options = TimelineOptions::new()
        .with_output_height(cli.height)
        .with_max_stripes(cli.stripes)
        .with_thumbnail_width(cli.thumbnail_width)
        .with_fast_decode(!cli.accurate)
        .with_encode_by_extension(cli.encode);

    if let Some(progress) = progress {
        options = options.with_progress(progress).with_batch_size(8);
    }
    options
}

fn print_summary(cli: &Cli, summary: &RenderSummary) {
    if cli.json {
        let payload = json!({
            "input": cli.input.display().to_string(),
            "output": cli.output.display().to_string(),
            "width": summary.stripes,
            "height": summary.height,
            "planned_stripes": summary.planned_stripes,
            "estimated_frames": summary.estimated_frames,
            "decoded_frames": summary.decoded_frames,
            "ffmpeg_log_level": cli.log_level.map(|level| level.to_string()),
        });
        println!("{payload}");
    } else if cli.verbose {
        eprintln!(
            "{} {}x{} timeline -> {}",
            "done".green().bold(),
            summary.stripes,
            summary.height,
            cli.output.display()
        );
    }
}

fn run(cli: &Cli) -> Result<RenderSummary, ChromashotError> {
    if let Some(level) = cli.log_level {
        chromashot::set_ffmpeg_log_level(level);
    }

    let progress = if cli.progress {
        match BarProgress::new() {
            Ok(bar) => Some(Arc::new(bar)),
            Err(error) => {
                log::warn!("progress bar unavailable: {error}");
                None
            }
        }
    } else {
        None
    };

    let options = timeline_options(cli, progress.clone());
    let summary = chromashot::render_to_file(&cli.input, &cli.output, &options)?;

    if let Some(progress) = progress {
        progress.bar.finish_and_clear();
    }
    Ok(summary)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(summary) => {
            print_summary(&cli, &summary);
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!(
                "{} {error}",
                format!("error[{}]:", error.stage()).red().bold()
            );
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use chromashot::OutputFormat;
    use image::ImageFormat;

    use super::{Cli, timeline_options};

    #[test]
    fn positional_arguments_use_default_constants() {
        let cli = Cli::try_parse_from(["chromashot", "in.mp4", "out.ppm"]).unwrap();
        let options = timeline_options(&cli, None);
        assert_eq!(options.output_height(), 1080);
        assert_eq!(options.max_stripes(), 1920);
        assert_eq!(options.thumbnail_width(), 160);
        assert!(options.fast_decode());
        assert!(!options.encode_by_extension());
    }

    #[test]
    fn any_output_name_is_written_as_ppm() {
        for output in ["out.raw", "out.rgb", "out.bin", "out.png", "out"] {
            let cli = Cli::try_parse_from(["chromashot", "in.mp4", output]).unwrap();
            let options = timeline_options(&cli, None);
            assert_eq!(options.output_format(&cli.output), OutputFormat::Ppm, "{output}");
        }
    }

    #[test]
    fn encode_flag_selects_format_by_extension() {
        let cli = Cli::try_parse_from(["chromashot", "in.mp4", "out.png", "--encode"]).unwrap();
        let options = timeline_options(&cli, None);
        assert_eq!(
            options.output_format(&cli.output),
            OutputFormat::Image(ImageFormat::Png)
        );
    }

    #[test]
    fn flags_override_constants() {
        let cli = Cli::try_parse_from([
            "chromashot",
            "in.mp4",
            "out.png",
            "--height",
            "200",
            "--stripes",
            "50",
            "--thumbnail-width",
            "64",
            "--accurate",
        ])
        .unwrap();
        let options = timeline_options(&cli, None);
        assert_eq!(options.output_height(), 200);
        assert_eq!(options.max_stripes(), 50);
        assert_eq!(options.thumbnail_width(), 64);
        assert!(!options.fast_decode());
    }

    #[test]
    fn log_level_is_parsed() {
        let cli =
            Cli::try_parse_from(["chromashot", "in.mp4", "out.ppm", "--log-level", "WARN"])
                .unwrap();
        assert_eq!(cli.log_level, Some(chromashot::FfmpegLogLevel::Warning));

        let rejected =
            Cli::try_parse_from(["chromashot", "in.mp4", "out.ppm", "--log-level", "loud"]);
        assert!(rejected.is_err());
    }

    #[test]
    fn missing_output_is_rejected() {
        assert!(Cli::try_parse_from(["chromashot", "in.mp4"]).is_err());
    }
}
