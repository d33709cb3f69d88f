//! Figure layout per simulated system, and rendering of a whole run tree.

mod plot;

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::cli::TestLabel;
use crate::results::{ResultTable, RunTree};

/// The systems the demo binary simulates, keyed by their output directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemKind {
    Exponential,
    Sigmoid,
    Time,
    TimeCountDown,
    SpringDamper,
}

impl SystemKind {
    pub const ALL: [SystemKind; 5] = [
        SystemKind::Exponential,
        SystemKind::Sigmoid,
        SystemKind::Time,
        SystemKind::TimeCountDown,
        SystemKind::SpringDamper,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            SystemKind::Exponential => "ExponentialSystem",
            SystemKind::Sigmoid => "SigmoidSystem",
            SystemKind::Time => "TimeSystem",
            SystemKind::TimeCountDown => "TimeCountDownSystem",
            SystemKind::SpringDamper => "SpringDamperSystem",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.dir_name() == name)
    }

    pub fn is_second_order(self) -> bool {
        matches!(self, SystemKind::SpringDamper)
    }
}

/// What one panel plots against time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Full state `x`.
    State,
    /// Full derivative `xd`.
    Rate,
    /// `y`, first half of `x` of a second-order system.
    Position,
    /// `yd`, first half of `xd`.
    Velocity,
    /// `ydd`, second half of `xd`.
    Acceleration,
}

impl Quantity {
    pub fn axis_label(self) -> &'static str {
        match self {
            Quantity::State => "x",
            Quantity::Rate => "xd",
            Quantity::Position => "y",
            Quantity::Velocity => "yd",
            Quantity::Acceleration => "ydd",
        }
    }

    /// Columns of `table` this quantity reads.
    pub fn columns(self, table: &ResultTable) -> Range<usize> {
        let x = table.x_columns();
        let xd = table.xd_columns();
        let half = table.state_dims() / 2;
        match self {
            Quantity::State => x,
            Quantity::Rate => xd,
            Quantity::Position => x.start..x.start + half,
            Quantity::Velocity => xd.start..xd.start + half,
            Quantity::Acceleration => xd.start + half..xd.end,
        }
    }
}

/// Subplot grid for one figure. The top row shows the runs; with a comparison the
/// bottom row repeats the same quantities for the difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub rows: usize,
    pub cols: usize,
    pub quantities: &'static [Quantity],
}

impl PanelLayout {
    #[allow(dead_code)]
    pub fn panel_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn has_diff_row(&self) -> bool {
        self.rows == 2
    }

    /// Layout for `kind` with `label_count` runs (1 or 2). Unknown systems are first order.
    pub fn for_system(kind: Option<SystemKind>, label_count: usize) -> Self {
        const FIRST_ORDER: &[Quantity] = &[Quantity::State, Quantity::Rate];
        const SECOND_ORDER: &[Quantity] =
            &[Quantity::Position, Quantity::Velocity, Quantity::Acceleration];

        let second_order = kind.is_some_and(SystemKind::is_second_order);
        match (label_count, second_order) {
            (1, _) => PanelLayout { rows: 1, cols: 2, quantities: FIRST_ORDER },
            (_, false) => PanelLayout { rows: 2, cols: 2, quantities: FIRST_ORDER },
            (_, true) => PanelLayout { rows: 2, cols: 3, quantities: SECOND_ORDER },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub plot_dir: PathBuf,
    pub size: (u32, u32),
}

/// One line in a panel.
pub(crate) struct Trace<'a> {
    pub name: String,
    pub table: &'a ResultTable,
    pub style: TraceStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraceStyle {
    /// Lone run: one colour per dimension.
    Single,
    /// First run of a comparison.
    Reference,
    /// Second run of a comparison.
    Compared,
    Difference,
}

pub fn figure_title(system: &str, labels: &[TestLabel]) -> String {
    match labels {
        [a, b] => format!("{}  ({} vs {})", system, a, b),
        [a, ..] => format!("{}  ({})", system, a),
        [] => system.to_string(),
    }
}

pub fn figure_path(plot_dir: &Path, system: &str, labels: &[TestLabel]) -> PathBuf {
    let stem = match labels {
        [a, b] => format!("{}_{}_vs_{}", system, a, b),
        [a, ..] => format!("{}_{}", system, a),
        [] => system.to_string(),
    };
    plot_dir.join(format!("{stem}.png"))
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Draw one figure per system directory under `tree`. Returns the written files.
pub fn render_run_tree(
    tree: &RunTree,
    labels: &[TestLabel],
    opts: &RenderOptions,
) -> Result<Vec<PathBuf>> {
    anyhow::ensure!(
        (1..=2).contains(&labels.len()),
        "expected one or two labels, got {}",
        labels.len()
    );
    let systems = tree.systems()?;
    fs::create_dir_all(&opts.plot_dir)
        .with_context(|| format!("failed to create '{}'", opts.plot_dir.display()))?;

    let mut written = Vec::new();
    for system in systems {
        if same_dir(&tree.root().join(&system), &opts.plot_dir) {
            continue;
        }
        let kind = SystemKind::from_dir_name(&system);
        if kind.is_none() {
            warn!(%system, "unknown system type, plotting as first order");
        }
        let layout = PanelLayout::for_system(kind, labels.len());
        let path = figure_path(&opts.plot_dir, &system, labels);
        let title = figure_title(&system, labels);
        let first = tree.load(&system, labels[0])?;
        debug!(
            %system,
            rows = layout.rows,
            cols = layout.cols,
            steps = first.rows(),
            columns = first.cols(),
            "layout"
        );

        if let [a, b] = labels {
            let second = tree.load(&system, *b)?;
            let diff = first
                .difference(&second)
                .with_context(|| format!("comparing {} runs in {}", a, system))?;
            let runs = [
                Trace { name: a.to_string(), table: &first, style: TraceStyle::Reference },
                Trace { name: b.to_string(), table: &second, style: TraceStyle::Compared },
            ];
            let diff = Trace { name: "diff".into(), table: &diff, style: TraceStyle::Difference };
            plot::draw_figure(&path, opts.size, &title, &layout, &runs, Some(&diff))?;
        } else {
            let runs = [Trace { name: labels[0].to_string(), table: &first, style: TraceStyle::Single }];
            plot::draw_figure(&path, opts.size, &title, &layout, &runs, None)?;
        }
        written.push(path);
    }
    Ok(written)
}
