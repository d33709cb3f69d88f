use std::fmt;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "dynsys-demo", about = "Run the dynamical systems demo and plot its results", version)]
pub struct Cli {
    /// One or two test labels. With two, the runs are compared in one figure.
    #[arg(value_name = "TEST", value_enum)]
    pub labels: Vec<TestLabel>,

    /// Directory the demo binary writes its results to.
    #[arg(long = "output-dir")]
    pub output_dir: Option<String>,

    /// Fallback directory holding the demo binary (searched after ./).
    #[arg(long = "bin-dir")]
    pub bin_dir: Option<String>,

    /// Name of the demo binary.
    #[arg(long)]
    pub executable: Option<String>,

    /// Run this executable directly instead of searching ./ and the bin dir.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["bin_dir", "executable"])]
    pub binary: Option<String>,

    /// Directory the PNG figures are written to.
    #[arg(long = "plot-dir")]
    pub plot_dir: Option<String>,

    /// Do not echo the executed command.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose diagnostics on stderr (same as RUST_LOG=debug).
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// List the available test labels.
    #[arg(long = "list-labels")]
    pub list_labels: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// The demo takes one label, or two for a comparison.
    pub fn has_valid_arity(&self) -> bool {
        (1..=2).contains(&self.labels.len())
    }
}

/// Scenario selector understood by the demo binary.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestLabel {
    Rungekutta,
    Euler,
    Analytical,
    Tau,
    Attractor,
    Perturb,
}

impl TestLabel {
    pub const ALL: [TestLabel; 6] = [
        TestLabel::Rungekutta,
        TestLabel::Euler,
        TestLabel::Analytical,
        TestLabel::Tau,
        TestLabel::Attractor,
        TestLabel::Perturb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestLabel::Rungekutta => "rungekutta",
            TestLabel::Euler => "euler",
            TestLabel::Analytical => "analytical",
            TestLabel::Tau => "tau",
            TestLabel::Attractor => "attractor",
            TestLabel::Perturb => "perturb",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TestLabel::Rungekutta => "Use 4th-order Runge-Kutta numerical integration.",
            TestLabel::Euler => "Use simple Euler numerical integration.",
            TestLabel::Analytical => {
                "Compute analytical solution (rather than numerical integration)"
            }
            TestLabel::Tau => "Change the time constant \"tau\"",
            TestLabel::Attractor => "Change the attractor state during the integration",
            TestLabel::Perturb => "Perturb the system during the integration",
        }
    }

    /// File the demo binary writes for this label inside each system directory.
    pub fn results_file_name(self) -> String {
        format!("results_{}.txt", self.as_str())
    }
}

impl fmt::Display for TestLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn label_listing() -> String {
    let mut out = String::from("Available test labels are:\n");
    for label in TestLabel::ALL {
        out.push_str(&format!("   {:<10} - {}\n", label.as_str(), label.description()));
    }
    out
}

pub fn usage_text(program: &str) -> String {
    format!(
        "\nUsage: {} <test1> [test2]\n\n{}\nIf you call with two tests, the results of the two are compared in one plot.\n",
        program,
        label_listing()
    )
}

/// Joins the output directory and labels into the demo binary's argument string.
pub fn demo_arguments(output_dir: &str, labels: &[TestLabel]) -> String {
    let mut arguments = output_dir.to_string();
    for label in labels {
        arguments.push(' ');
        arguments.push_str(label.as_str());
    }
    arguments
}
