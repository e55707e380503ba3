use std::path::{Path, PathBuf};
use std::process::ExitCode;

use case_report_pdf::{CaseRecord, Error, FontSet, ReportConfig, ReportGenerator, TrueTypeFace, Variant};
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Dentist,
    Lab,
    Both,
}

impl VariantArg {
    fn variants(self) -> &'static [Variant] {
        match self {
            VariantArg::Dentist => &[Variant::Dentist],
            VariantArg::Lab => &[Variant::Lab],
            VariantArg::Both => &Variant::ALL,
        }
    }
}

/// Render an implant case record into Dentist and Lab PDF reports
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Case record (JSON)
    case_json: PathBuf,

    /// Which report to build
    #[arg(long, value_enum, default_value = "dentist")]
    variant: VariantArg,

    /// Directory the reports are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Page geometry and typography overrides (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// TrueType font to embed instead of Helvetica
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold face; defaults to --font
    #[arg(long, requires = "font")]
    bold_font: Option<PathBuf>,

    /// Italic face; defaults to --font
    #[arg(long, requires = "font")]
    italic_font: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_face(path: &Path) -> Result<TrueTypeFace, Error> {
    TrueTypeFace::parse(std::fs::read(path)?)
}

fn build_generator(cli: &Cli) -> Result<ReportGenerator, Error> {
    let config = match &cli.config {
        Some(path) => ReportConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ReportConfig::default(),
    };
    let mut generator = ReportGenerator::new(config)?;
    if let Some(regular) = &cli.font {
        let bold = cli.bold_font.as_deref().map(load_face).transpose()?;
        let italic = cli.italic_font.as_deref().map(load_face).transpose()?;
        generator = generator.with_fonts(FontSet::truetype(load_face(regular)?, bold, italic));
    }
    Ok(generator)
}

fn run(cli: &Cli) -> Result<Vec<PathBuf>, Error> {
    let generator = build_generator(cli)?;
    let case = CaseRecord::from_json(&std::fs::read(&cli.case_json)?)?;
    std::fs::create_dir_all(&cli.out_dir)?;

    // Variants are independent builds over the same read-only inputs.
    std::thread::scope(|scope| {
        let handles: Vec<_> = cli
            .variant
            .variants()
            .iter()
            .map(|&variant| {
                let (generator, case) = (&generator, &case);
                scope.spawn(move || generator.generate(case, variant)?.save(&cli.out_dir))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("could not generate report: {e}");
            ExitCode::FAILURE
        }
    }
}
