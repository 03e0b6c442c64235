// CLI argument definitions and the single/batch drivers

use clap::{ArgGroup, Parser, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::generate::{all_generators, Generator, TestPath};
use crate::metrics::MetricsReport;
use crate::sut::{LoadError, Sut};

/// Wayfarer - Constrained Path-based Testing engine
///
/// Loads a directed control-flow model of a System Under Test, generates
/// test paths with the CPC, Filter and Edge algorithms, and reports
/// coverage and validity metrics for each.
#[derive(Parser, Debug, Clone)]
#[command(name = "wayfarer")]
#[command(author, version, about)]
#[command(group = ArgGroup::new("input").required(true).args(["file", "dir"]))]
pub struct Cli {
    /// Run a single SUT model file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Run every *.txt model in a directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Tee the report output to a log file
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Print the generated test paths
    #[arg(long)]
    pub show_paths: bool,

    /// Export the model graph as Graphviz DOT
    #[arg(long)]
    pub to_dot: Option<PathBuf>,

    /// Render the model graph to PNG (requires Graphviz `dot`)
    #[arg(long)]
    pub to_png: Option<PathBuf>,

    /// Write per-case metrics as CSV (batch mode)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Report format (file mode)
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output: OutputFormat,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// Compact JSON for programmatic consumption
    Json,
    /// Formatted JSON with indentation
    Pretty,
}

// ============================================================================
// Response Structs for JSON Output
// ============================================================================

/// One generator run for JSON output
#[derive(Serialize)]
struct CaseReport {
    algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<Vec<Vec<String>>>,
    metrics: MetricsReport,
}

/// Full report for a single model file
#[derive(Serialize)]
struct FileReport {
    file: String,
    model: String,
    cases: Vec<CaseReport>,
}

// ============================================================================
// CSV schema
// ============================================================================

const CSV_COLUMNS: [&str; 13] = [
    "valid(T)",
    "size",
    "lT",
    "u_edges(T)",
    "avg(|t|)",
    "s(T)",
    "eff_edges(T)",
    "cov_cp_positive(T)",
    "cov_cp_once(T)",
    "cov_cp_negative(T)",
    "cov_cp_only-once(T)",
    "cov_edges(T)",
    "time[ms]",
];

fn csv_header(tag: &str) -> Vec<String> {
    let mut row = vec![tag.to_string()];
    row.extend(CSV_COLUMNS.iter().map(|c| c.to_string()));
    row
}

fn csv_row(name: &str, m: &MetricsReport) -> Vec<String> {
    vec![
        name.to_string(),
        m.valid.to_string(),
        m.size.to_string(),
        m.total_edges.to_string(),
        m.unique_edges.to_string(),
        format!("{:?}", m.average_length),
        format!("{:?}", m.length_std_dev),
        format!("{:?}", m.edge_efficiency),
        format!("{:?}", m.cov_positive),
        format!("{:?}", m.cov_once),
        format!("{:?}", m.cov_negative),
        format!("{:?}", m.cov_max_once),
        format!("{:?}", m.edge_coverage),
        format!("{:?}", m.time_ms),
    ]
}

// ============================================================================
// Command Handlers
// ============================================================================

pub mod cmds {
    use super::*;
    use crate::output;
    use crate::sut;
    use anyhow::{Context, Result};
    use std::fs;
    use std::io::Write;
    use std::time::Instant;

    pub fn run(cli: Cli) -> Result<()> {
        let mut out = make_writer(cli.log.as_deref())?;
        if let Some(file) = cli.file.clone() {
            run_file(&cli, &file, &mut out)
        } else if let Some(dir) = cli.dir.clone() {
            run_dir(&cli, &dir, &mut out)
        } else {
            // clap's input group guarantees one of the two
            unreachable!("no input source")
        }
    }

    /// Stdout, or a tee of stdout and the log file
    fn make_writer(log: Option<&Path>) -> Result<Box<dyn Write>> {
        match log {
            Some(path) => {
                let file = fs::File::create(path)
                    .with_context(|| format!("cannot create log file {}", path.display()))?;
                Ok(Box::new(output::TeeWriter::new(vec![
                    Box::new(std::io::stdout()),
                    Box::new(file),
                ])))
            }
            None => Ok(Box::new(std::io::stdout())),
        }
    }

    /// Load a model, exiting with the documented code on failure
    fn load_or_exit(path: &Path) -> Sut {
        match sut::load_from_path(path) {
            Ok(sut) => sut,
            Err(err @ LoadError::File { .. }) => {
                tracing::error!("{err}");
                std::process::exit(output::EXIT_FILE_LOAD);
            }
            Err(err @ LoadError::Parse { .. }) => {
                tracing::error!("{err}");
                std::process::exit(output::EXIT_PARSE_FORMAT);
            }
        }
    }

    /// Time one generator run and collect its metrics
    fn run_case(sut: &Sut, generator: &dyn Generator) -> (Vec<TestPath>, MetricsReport) {
        let t0 = Instant::now();
        let tests = generator.generate(sut);
        let time_ms = t0.elapsed().as_secs_f64() * 1000.0;
        let report = MetricsReport::collect(sut, &tests, time_ms);
        (tests, report)
    }

    fn run_file(cli: &Cli, path: &Path, out: &mut Box<dyn Write>) -> Result<()> {
        let sut = load_or_exit(path);
        tracing::info!(file = %path.display(), "model loaded");

        match cli.output {
            OutputFormat::Human => {
                writeln!(out, "===== SUT Info =====")?;
                writeln!(out, "{}", sut)?;
                writeln!(out)?;
                for generator in all_generators() {
                    writeln!(out, "===== {} Result =====", generator.name())?;
                    let (tests, report) = run_case(&sut, generator);
                    if cli.show_paths {
                        writeln!(out, "Path:")?;
                        for test in &tests {
                            writeln!(out, "  {}", sut.path_to_string(test))?;
                        }
                        writeln!(out)?;
                    }
                    print_report(out, &report)?;
                }
            }
            OutputFormat::Json | OutputFormat::Pretty => {
                let report = collect_file_report(cli, path, &sut);
                let json = if cli.output == OutputFormat::Json {
                    serde_json::to_string(&report)?
                } else {
                    serde_json::to_string_pretty(&report)?
                };
                writeln!(out, "{}", json)?;
            }
        }

        export_graph(cli, &sut)?;
        Ok(())
    }

    fn collect_file_report(cli: &Cli, path: &Path, sut: &Sut) -> FileReport {
        let cases = all_generators()
            .into_iter()
            .map(|generator| {
                let (tests, metrics) = run_case(sut, generator);
                let paths = cli.show_paths.then(|| {
                    tests
                        .iter()
                        .map(|p| sut.path_labels(p).iter().map(|s| s.to_string()).collect())
                        .collect()
                });
                CaseReport {
                    algorithm: generator.name().to_string(),
                    paths,
                    metrics,
                }
            })
            .collect();
        FileReport {
            file: path.display().to_string(),
            model: sut.to_string(),
            cases,
        }
    }

    /// Per-case report lines, one metric per line
    fn print_report(out: &mut Box<dyn Write>, m: &MetricsReport) -> Result<()> {
        writeln!(out, "valid(T) = {}", m.valid)?;
        writeln!(out, "|T| = {}", m.size)?;
        writeln!(out, "l(T) = {}", m.total_edges)?;
        writeln!(out, "u_edges(T) = {}", m.unique_edges)?;
        writeln!(out, "avg(|t|) = {:?}", m.average_length)?;
        writeln!(out, "s(T) = {:?}", m.length_std_dev)?;
        writeln!(out, "eff_edges(T) = {:?}", m.edge_efficiency)?;
        writeln!(out, "cov_cp_positive(T) = {:?}", m.cov_positive)?;
        writeln!(out, "cov_cp_once(T) = {:?}", m.cov_once)?;
        writeln!(out, "cov_cp_negative(T) = {:?}", m.cov_negative)?;
        writeln!(out, "cov_cp_only-once(T) = {:?}", m.cov_max_once)?;
        writeln!(out, "edge_cov(T) = {:?}", m.edge_coverage)?;
        writeln!(out, "t[ms] = {:?}", m.time_ms)?;
        writeln!(out)?;
        Ok(())
    }

    fn export_graph(cli: &Cli, sut: &Sut) -> Result<()> {
        if cli.to_dot.is_none() && cli.to_png.is_none() {
            return Ok(());
        }
        let dot_path = match (&cli.to_dot, &cli.to_png) {
            (Some(dot), _) => dot.clone(),
            (None, Some(png)) => png.with_extension("dot"),
            (None, None) => unreachable!(),
        };
        sut::write_dot(sut, &dot_path)
            .with_context(|| format!("cannot write DOT file {}", dot_path.display()))?;
        if let Some(png) = &cli.to_png {
            sut::render_to_png(&dot_path, png)
                .with_context(|| format!("cannot render PNG {}", png.display()))?;
        }
        Ok(())
    }

    fn run_dir(cli: &Cli, dir: &Path, out: &mut Box<dyn Write>) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("cannot read directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        files.sort();
        if files.is_empty() {
            tracing::warn!("no .txt model found in {}", dir.display());
            return Ok(());
        }

        // Load everything up front; a failing file is reported and skipped
        let mut cases: Vec<(String, Sut)> = Vec::new();
        for path in &files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match sut::load_from_path(path) {
                Ok(sut) => cases.push((name, sut)),
                Err(err) => {
                    tracing::error!("{err}; model skipped");
                }
            }
        }
        writeln!(out, "Number of cases: {}", cases.len())?;

        let mut csv_writer = match &cli.csv {
            Some(path) => Some(
                csv::WriterBuilder::new()
                    .flexible(true)
                    .from_path(path)
                    .with_context(|| format!("cannot create CSV file {}", path.display()))?,
            ),
            None => None,
        };

        for generator in all_generators() {
            writeln!(out, "===== {} Result =====", generator.name())?;
            if let Some(w) = csv_writer.as_mut() {
                w.write_record(csv_header(generator.name()))?;
            }

            let mut totals = Totals::default();
            for (name, sut) in &cases {
                let (tests, report) = run_case(sut, generator);
                if cli.show_paths {
                    writeln!(out, "===== {} =====", name)?;
                    for test in &tests {
                        writeln!(out, "  {}", sut.path_to_string(test))?;
                    }
                    writeln!(out)?;
                }
                if let Some(w) = csv_writer.as_mut() {
                    w.write_record(csv_row(name, &report))?;
                }
                totals.add(&report);
            }

            if cli.show_paths {
                writeln!(out, "===== Total Result =====")?;
            }
            totals.print(out, cases.len())?;
            if let Some(w) = csv_writer.as_mut() {
                // Blank record separates the algorithm blocks
                w.write_record([""])?;
            }
        }

        if let Some(w) = csv_writer.as_mut() {
            w.flush()?;
        }
        Ok(())
    }

    /// Aggregates across a batch, per generator
    #[derive(Default)]
    struct Totals {
        valid_cases: usize,
        size_sum: usize,
        total_edges_sum: usize,
        std_dev_sum: f64,
        efficiency_sum: f64,
        coverage_sum: f64,
        time_ms_sum: f64,
    }

    impl Totals {
        fn add(&mut self, m: &MetricsReport) {
            if m.valid > 0 {
                self.valid_cases += 1;
            }
            self.size_sum += m.size;
            self.total_edges_sum += m.total_edges;
            self.std_dev_sum += m.length_std_dev;
            self.efficiency_sum += m.edge_efficiency;
            self.coverage_sum += m.edge_coverage;
            self.time_ms_sum += m.time_ms;
        }

        fn print(&self, out: &mut Box<dyn Write>, cases: usize) -> Result<()> {
            let n = cases.max(1) as f64;
            writeln!(out, "Valid rate = {:?}", self.valid_cases as f64 / n)?;
            writeln!(out, "Avg |T| = {:?}", self.size_sum as f64 / n)?;
            writeln!(out, "Avg l(T) = {:?}", self.total_edges_sum as f64 / n)?;
            writeln!(out, "Avg s(T) = {:?}", self.std_dev_sum / n)?;
            writeln!(out, "Avg eff_edges(T) = {:?}", self.efficiency_sum / n)?;
            writeln!(out, "Avg edge_cov(T) = {:?}", self.coverage_sum / n)?;
            writeln!(out, "Avg t[ms] = {:?}", self.time_ms_sum / n)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_asserts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_file_and_dir_conflict() {
        let res = Cli::try_parse_from(["wayfarer", "--file", "a.txt", "--dir", "b"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_input_required() {
        let res = Cli::try_parse_from(["wayfarer"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_parse_full_flags() {
        let cli = Cli::try_parse_from([
            "wayfarer",
            "--file",
            "model.txt",
            "--log",
            "run.log",
            "--show-paths",
            "--to-dot",
            "model.dot",
            "--csv",
            "result.csv",
        ])
        .unwrap();
        assert_eq!(cli.file.as_deref(), Some(Path::new("model.txt")));
        assert!(cli.show_paths);
        assert_eq!(cli.output, OutputFormat::Human);
    }

    #[test]
    fn test_csv_header_shape() {
        let header = csv_header("CPC");
        assert_eq!(header.len(), 14);
        assert_eq!(header[0], "CPC");
        assert_eq!(header[13], "time[ms]");
    }

    #[test]
    fn test_csv_row_shape() {
        let sut = {
            let mut sut = Sut::new();
            sut.set_start("START");
            sut.add_edge("START", "END1");
            sut.add_end("END1");
            sut
        };
        let report = MetricsReport::collect(&sut, &[], 1.5);
        let row = csv_row("case.txt", &report);
        assert_eq!(row.len(), 14);
        assert_eq!(row[0], "case.txt");
        assert_eq!(row[1], "1"); // valid
        assert_eq!(row[13], "1.5"); // time[ms]
    }
}
