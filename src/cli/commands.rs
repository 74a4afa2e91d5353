//! Command dispatch
//!
//! Each handler assembles `ChartOptions` from settings, files and flags,
//! runs the layout service and prints the result.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::options::ChartOptions;
use crate::application::props::ChartProps;
use crate::application::ApplicationError;
use crate::cli::args::{ChartArgs, Cli, Commands, ConfigCommands, SumByArg};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{format_number, HierarchyBuilder, LabelSource, LabelValue, SortOrder, SumBy};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| CliError::Usage(e.to_string()))?;
        return Ok(());
    };

    // Completions and config paths must work even with a broken config file
    match command {
        Commands::Completion { shell } => return completion(*shell),
        Commands::Config {
            command: ConfigCommands::Template,
        } => {
            output::info(&Settings::template());
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Path,
        } => return config_path(cli.config.as_deref()),
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Layout {
            chart,
            output,
            compact,
        } => layout(&container, chart, output.as_deref(), *compact),
        Commands::Slices { chart } => slices(&container, chart),
        Commands::Tree { data, sum_by, sort } => tree(&container, data.as_deref(), *sum_by, *sort),
        Commands::Config {
            command: ConfigCommands::Show,
        } => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

/// Settings < options file < theme/data files < flags.
fn chart_options(container: &ServiceContainer, args: &ChartArgs) -> CliResult<ChartOptions> {
    let mut options = container.base_options()?;
    if let Some(path) = &args.options {
        options = options.overlay(container.loader.load_options(path)?);
    }
    if let Some(path) = &args.theme {
        options.theme = Some(container.loader.load_theme(path)?);
    }
    if let Some(path) = &args.data {
        options.data = Some(container.loader.load_tree(path)?);
    }
    let mut options = options.overlay(args.to_options());
    if args.percent {
        options.labels = Some(percent_labels());
    }
    Ok(options)
}

/// `"<name> <share>%"`, share of the root weight with one decimal.
fn percent_labels() -> LabelSource {
    LabelSource::computed(|slice, total| {
        if total == 0.0 {
            return Ok(LabelValue::from(slice.data.name.as_str()));
        }
        let share = (slice.weight / total * 1000.0).round() / 10.0;
        Ok(LabelValue::Text(format!(
            "{} {}%",
            slice.data.name,
            format_number(share)
        )))
    })
}

fn render(container: &ServiceContainer, args: &ChartArgs) -> CliResult<ChartProps> {
    let options = chart_options(container, args)?;
    let props = container.sunburst.base_props(&options)?;
    if let Some(active) = options.active_node_index {
        if props.parent.tooltip.is_none() {
            output::warning(&format!("no tooltip for active index {active}"));
        }
    }
    Ok(props)
}

#[instrument(skip(container, args))]
fn layout(
    container: &ServiceContainer,
    args: &ChartArgs,
    output_path: Option<&Path>,
    compact: bool,
) -> CliResult<()> {
    let props = render(container, args)?;
    let pretty = container.settings.pretty && !compact;
    let json = props
        .to_json(pretty)
        .map_err(|e| ApplicationError::OperationFailed {
            context: "serialize chart".into(),
            source: Box::new(e),
        })?;

    match output_path {
        Some(path) => {
            container.write_output(path, &json)?;
            output::action("Wrote", &path.display());
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(skip(container, args))]
fn slices(container: &ServiceContainer, args: &ChartArgs) -> CliResult<()> {
    let props = render(container, args)?;
    let parent = &props.parent;

    output::header(&format!(
        "{} slices, radius {}, total {}",
        props.slices.len(),
        format_number(parent.radius),
        format_number(parent.total_weight)
    ));
    if props.slices.is_empty() {
        output::warning("no visible slices");
    }

    for (key, entry) in props.in_visible_order() {
        let data = &entry.data;
        let slice = &data.slice;
        let label = entry
            .labels
            .as_ref()
            .and_then(|l| l.text.as_deref())
            .map(|text| format!(" \"{text}\""))
            .unwrap_or_default();
        output::detail(&format!(
            "{} {:>3} {:<8} {}{:<12} weight {:<6} span {:>7.2}° ring {}..{} {}{}",
            output::swatch(&data.fill),
            data.index,
            key.to_string(),
            "  ".repeat(slice.depth),
            slice.data.name,
            format_number(slice.weight),
            slice.span().to_degrees(),
            format_number(slice.y0.round()),
            format_number(slice.y1.round()),
            data.fill,
            label
        ));
    }

    if let Some(tooltip) = &parent.tooltip {
        output::detail(&format!("tooltip: {}", tooltip.text));
    }
    Ok(())
}

#[instrument(skip(container))]
fn tree(
    container: &ServiceContainer,
    data: Option<&Path>,
    sum_by: Option<SumByArg>,
    sort: bool,
) -> CliResult<()> {
    let options = container.base_options()?;
    let root = match data {
        Some(path) => container.loader.load_tree(path)?,
        None => container.sunburst.resolve(&options).data,
    };
    let sum_by = sum_by
        .map(SumBy::from)
        .or(options.sum_by)
        .unwrap_or_default();
    let sort = if sort {
        SortOrder::Descending
    } else {
        options.sort_data.unwrap_or_default()
    };
    debug!("tree: sum_by={}, sort={:?}", sum_by, sort);

    let weighted = HierarchyBuilder::new(sum_by)
        .with_sort(sort)
        .build(&root)
        .map_err(ApplicationError::from)?;
    output::info(&weighted.to_tree_string());
    output::detail(&format!("leaves: {}", weighted.leaf_nodes().iter().join(", ")));
    Ok(())
}

fn config_path(local: Option<&Path>) -> CliResult<()> {
    let mark = |path: &Path| if path.exists() { "" } else { " (not found)" };

    match global_config_path() {
        Some(path) => output::action("Global", &format!("{}{}", path.display(), mark(&path))),
        None => output::warning("no config directory on this platform"),
    }
    let local: PathBuf = local
        .map(Path::to_path_buf)
        .unwrap_or_else(|| local_config_path(Path::new(".")));
    output::action("Local", &format!("{}{}", local.display(), mark(&local)));
    Ok(())
}

fn completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
