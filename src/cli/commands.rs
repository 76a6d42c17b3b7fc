//! Command dispatch

use std::io;
use std::path::Path;
use std::time::Duration;

use clap::CommandFactory;
use clap_complete::generate;
use colored::Colorize;
use tracing::{debug, instrument};

use crate::application::render::{decomposition_view, tree_view_with};
use crate::application::{ApplicationError, Player, TreeDescription};
use crate::cli::args::{Cli, Commands, ConfigCommands, Shape};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::generators::{self, LabelledTree};
use crate::domain::{
    CentroidEvent, Decomposition, DecompositionBuilder, DecompositionEvents, Graph, NodeData,
    NodeId,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = || Settings::load(cli.config.as_deref()).map_err(CliError::from);
    match &cli.command {
        Some(Commands::Decompose {
            file,
            steps,
            animate,
            delay_ms,
            start,
        }) => {
            let settings = settings()?;
            let delay = match (animate, delay_ms) {
                (false, _) => Duration::ZERO,
                (true, Some(ms)) => Duration::from_millis(*ms),
                (true, None) => settings.playback.step_delay(),
            };
            _decompose(
                file,
                &settings,
                *steps || *animate,
                delay,
                start.as_deref(),
            )
        }
        Some(Commands::Check { file }) => _check(file, &settings()?),
        Some(Commands::Show { file }) => _show(file, &settings()?),
        Some(Commands::Generate {
            shape,
            size,
            output: target,
        }) => _generate(*shape, *size, target.as_deref()),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => {
                output::info(&settings()?.to_toml()?);
                Ok(())
            }
            ConfigCommands::Template => {
                output::info(&Settings::template());
                Ok(())
            }
            ConfigCommands::Path => {
                match global_config_path() {
                    Some(path) => output::info(&path.display()),
                    None => output::info("no config directory available"),
                }
                Ok(())
            }
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `centroid --help`".to_string(),
        )),
    }
}

fn load_tree(file: &Path, settings: &Settings) -> CliResult<LabelledTree> {
    let description = TreeDescription::load(file)?;
    Ok(description.to_graph(settings.default_edge_distance)?)
}

/// Why `graph` is not a tree, `None` if it is one.
pub fn tree_defect<N, E>(graph: &Graph<N, E>) -> Option<String> {
    if !graph.is_acyclic() {
        return Some("contains a cycle".to_string());
    }
    if !graph.is_connected() {
        return Some("not connected".to_string());
    }
    if !graph.is_empty() && graph.edge_count() != graph.node_count() - 1 {
        return Some(format!(
            "{} nodes but {} edges",
            graph.node_count(),
            graph.edge_count()
        ));
    }
    None
}

/// Label in the node's own color, if it has one.
fn painted(data: &NodeData) -> String {
    match &data.color {
        Some(color) => data.label.as_str().color(color.as_str()).to_string(),
        None => data.label.clone(),
    }
}

fn label(data: &NodeData, settings: &Settings) -> String {
    let text = painted(data);
    match (settings.render.show_positions, data.position) {
        (true, Some((x, y))) => format!("{} @({}, {})", text, x, y),
        _ => text,
    }
}

fn labels_of(graph: &LabelledTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .filter_map(|&id| graph.get_node(id).map(|n| painted(&n.data)))
        .collect()
}

fn print_step(graph: &LabelledTree, event: &CentroidEvent, settings: &Settings) {
    let centroid = graph
        .get_node(event.centroid)
        .map(|n| painted(&n.data))
        .unwrap_or_default();
    output::action(
        &format!("step {}", event.step + 1),
        &format!(
            "centroid {} (level {}, component of {})",
            centroid, event.level, event.component_size
        ),
    );
    if settings.playback.show_components && !event.components.is_empty() {
        output::detail(&format!(
            "components: {}",
            labels_of(graph, &event.components).join(", ")
        ));
    }
}

#[instrument(skip(settings))]
fn _decompose(
    file: &Path,
    settings: &Settings,
    show_steps: bool,
    delay: Duration,
    start: Option<&str>,
) -> CliResult<()> {
    let graph = load_tree(file, settings)?;
    if let Some(reason) = tree_defect(&graph) {
        return Err(ApplicationError::NotATree { reason }.into());
    }
    if graph.is_empty() {
        output::info("Empty tree");
        return Ok(());
    }

    let stream = match start {
        Some(wanted) => {
            let id = graph
                .nodes()
                .find(|(_, n)| n.data.label == wanted)
                .map(|(id, _)| id)
                .ok_or_else(|| CliError::InvalidArgs(format!("no node labelled {}", wanted)))?;
            DecompositionEvents::starting_at(&graph, id)?
        }
        None => DecompositionEvents::new(&graph),
    };

    debug!("decompose: delay={:?}, steps={}", delay, show_steps);
    let mut builder = DecompositionBuilder::new(&graph);
    let mut events = Vec::new();
    if show_steps {
        output::header("Centroid steps");
    }
    Player::new(delay).play(stream, |event| {
        builder.record(event)?;
        if show_steps {
            print_step(&graph, event, settings);
        }
        events.push(event.clone());
        Ok(())
    })?;

    let decomposition = Decomposition {
        tree: builder.finish(),
        events,
    };
    output::header(&format!(
        "Centroid decomposition ({} levels)",
        decomposition.tree.depth()
    ));
    output::info(&decomposition_view(&decomposition));
    Ok(())
}

#[instrument(skip(settings))]
fn _check(file: &Path, settings: &Settings) -> CliResult<()> {
    let graph = load_tree(file, settings)?;
    output::action("nodes", &graph.node_count());
    output::action("edges", &graph.edge_count());

    let report = |ok: bool, what: &str| {
        if ok {
            output::success(what);
        } else {
            output::failure(what);
        }
    };
    report(graph.is_acyclic(), "acyclic");
    report(graph.is_connected(), "connected");

    match tree_defect(&graph) {
        None => {
            output::success("tree");
            Ok(())
        }
        Some(reason) => Err(ApplicationError::NotATree { reason }.into()),
    }
}

#[instrument(skip(settings))]
fn _show(file: &Path, settings: &Settings) -> CliResult<()> {
    let graph = load_tree(file, settings)?;
    match graph.first_node() {
        Some(root) => {
            let view = tree_view_with(&graph, root, |_, data| label(data, settings));
            output::info(&view);
        }
        None => output::info("Empty tree"),
    }
    Ok(())
}

#[instrument]
fn _generate(shape: Shape, size: usize, target: Option<&Path>) -> CliResult<()> {
    let graph = match shape {
        Shape::Path => generators::path(size),
        Shape::Star => generators::star(size),
        Shape::Binary => {
            let depth = u32::try_from(size)
                .ok()
                .filter(|&d| d <= 24)
                .ok_or_else(|| CliError::InvalidArgs(format!("binary depth too large: {}", size)))?;
            generators::complete_binary(depth)
        }
    };
    let description = TreeDescription::from_graph(&graph);
    match target {
        Some(path) => {
            description.save(path)?;
            output::success(&format!("wrote {}", path.display()));
        }
        None => output::info(&description.to_toml()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_forest_then_defect_is_disconnected() {
        let mut graph: Graph<&str, ()> = Graph::new();
        graph.add_node("a");
        graph.add_node("b");
        assert_eq!(tree_defect(&graph), Some("not connected".to_string()));
    }

    #[test]
    fn given_colored_node_then_label_carries_its_color() {
        colored::control::set_override(true);
        let settings = Settings::default();
        let red = NodeData::new("A").colored("red");
        assert_eq!(label(&red, &settings), "\u{1b}[31mA\u{1b}[0m");
        colored::control::unset_override();
        assert_eq!(label(&NodeData::new("B").at(1, 2), &settings), "B");
    }

    #[test]
    fn given_generated_path_then_no_defect() {
        assert_eq!(tree_defect(&generators::path(4)), None);
    }
}
