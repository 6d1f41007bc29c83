use crate::algorithm::dijkstra::Dijkstra;
use crate::algorithm::step::GraphStep;
use crate::cli::Cli;
use crate::edit::mode::Selection;
use crate::error::AppError;
use crate::graph::editor::EditPolicy;
use crate::graph::vertex::VertexId;
use crate::scenario::demo::DemoScenario;
use crate::scenario::random::RandomScenario;
use crate::scenario::scenario::Scenario;
use crate::tui::app::App;
use crate::tui::draw::{AppLayout, draw_app};
use clap::Parser;
use crossterm::event::{EnableMouseCapture, Event, KeyEventKind};
use std::fmt::Display;
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

mod algorithm;
mod cli;
mod codec;
mod edit;
mod error;
mod graph;
mod logging;
mod scenario;
mod tui;

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.headless)?;

    let mut scenario = match (&cli.file, cli.seed) {
        (Some(path), _) => Scenario {
            graph: codec::codec::load(path)?,
            selection: Selection::default(),
        },
        (None, Some(seed)) => RandomScenario::build(seed, cli.vertices),
        (None, None) => DemoScenario::build(),
    };
    if !cli.start.is_empty() {
        scenario.selection.start = cli.start.iter().map(|i| VertexId(*i)).collect();
    }
    if !cli.end.is_empty() {
        scenario.selection.end = cli.end.iter().map(|i| VertexId(*i)).collect();
    }
    info!(
        vertices = scenario.graph.vertex_count(),
        edges = scenario.graph.edge_count(),
        "scenario ready"
    );

    if cli.headless {
        print_run(&scenario);
        return Ok(());
    }

    let policy = if cli.bidirectional {
        EditPolicy::Bidirectional
    } else {
        EditPolicy::Directed
    };

    let mut terminal = ratatui::init();
    let mut app = App::new(
        scenario,
        policy,
        Duration::from_millis(cli.delay_ms),
        cli.save.clone(),
    );
    crossterm::execute!(io::stdout(), EnableMouseCapture)?;

    while app.running {
        terminal.draw(|frame| draw_app(frame, &app))?;

        if crossterm::event::poll(Duration::from_millis(16))? {
            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.on_key(key.code, Instant::now())
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let layout = AppLayout::new(ratatui::layout::Rect::new(0, 0, size.width, size.height));
                    app.on_mouse(mouse, layout.canvas_inner());
                }
                _ => {}
            }
        }
        app.tick(Instant::now());
    }

    Ok(())
}

fn print_run(scenario: &Scenario) {
    let dijkstra = Dijkstra::new(
        scenario.selection.start.iter().copied(),
        scenario.selection.end.iter().copied(),
        &scenario.graph,
    );
    if !dijkstra.has_path() {
        println!("no path");
        return;
    }
    println!("path cost: {}", dijkstra.path_cost());
    for (i, step) in dijkstra.generate().iter().enumerate() {
        println!("{}", describe_step(i, step));
    }
}

fn join<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe_step(index: usize, step: &GraphStep) -> String {
    format!(
        "step {index}: current [{}] via [{}] used [{}] used edges [{}]",
        join(step.current_vertices()),
        join(step.current_edges()),
        join(step.used_vertices()),
        join(step.used_edges()),
    )
}
