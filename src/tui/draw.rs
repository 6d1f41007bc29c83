use crate::algorithm::playback::PlaybackState;
use crate::algorithm::step::Highlight;
use crate::edit::mode::PriceRequest;
use crate::graph::edge::Edge;
use crate::graph::vertex::VertexId;
use crate::tui::app::App;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Color::White;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table};
use std::collections::BTreeSet;

pub struct AppLayout {
    pub header: Rect,
    pub canvas: Rect,
    pub table: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(32)])
            .split(rows[1]);
        Self {
            header: rows[0],
            canvas: body[0],
            table: body[1],
            footer: rows[2],
        }
    }

    /// Canvas area without its border, where touches land.
    pub fn canvas_inner(&self) -> Rect {
        Block::default().borders(Borders::ALL).inner(self.canvas)
    }
}

pub fn draw_app(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    frame.render_widget(build_header(app), layout.header);
    render_canvas(frame, app, layout.canvas);
    frame.render_widget(build_vertex_table(app), layout.table);
    frame.render_widget(build_footer(app), layout.footer);
}

fn vertex_color(highlight: Highlight) -> Color {
    match highlight {
        Highlight::None => Color::White,
        Highlight::Start => Color::Green,
        Highlight::End => Color::Red,
        Highlight::Used => Color::Blue,
        Highlight::Current => Color::Yellow,
    }
}

fn edge_color(highlight: Highlight) -> Color {
    match highlight {
        Highlight::Current => Color::Yellow,
        Highlight::Used => Color::Blue,
        _ => Color::DarkGray,
    }
}

fn vertex_highlight(app: &App, id: VertexId) -> Highlight {
    match app.current_step() {
        Some(step) => step.vertex_highlight(id),
        None if app.selection().end.contains(&id) => Highlight::End,
        None if app.selection().start.contains(&id) => Highlight::Start,
        None => Highlight::None,
    }
}

fn edge_highlight(app: &App, edge: &Edge) -> Highlight {
    app.current_step()
        .map_or(Highlight::None, |step| step.edge_highlight(edge))
}

fn format_cost(cost: f64) -> String {
    if cost.is_nan() {
        String::new()
    } else {
        format!("{cost}")
    }
}

fn format_ids(ids: &BTreeSet<VertexId>) -> String {
    let ids = ids.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("{{{}}}", ids.join(" "))
}

fn build_header(app: &'_ App) -> Block<'_> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut spans = vec![
        Span::raw(" Pathgraph ").style(Style::default().bold().cyan()),
        Span::raw("|").style(dim),
        Span::raw(" Mode: ").style(dim),
        Span::raw(app.mode().to_string()).style(Style::default().bold()),
        Span::raw("  Edges: ").style(dim),
        Span::raw(format!("{:?}", app.policy()).to_lowercase()),
    ];
    if let Some(dijkstra) = app.dijkstra() {
        spans.push(Span::raw("  Cost: ").style(dim));
        let cost = if dijkstra.has_path() {
            format!("{}", dijkstra.path_cost())
        } else {
            "no path".to_string()
        };
        spans.push(Span::raw(cost).style(Style::default().bold()));
    }
    if let Some(step) = app.current_step() {
        spans.push(Span::raw(format!(
            "  {} -> {}",
            format_ids(step.start()),
            format_ids(step.end())
        )));
    }
    if let Some(playback) = app.playback() {
        let state = match playback.state() {
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Finished => "done",
            PlaybackState::Cancelled => "cancelled",
        };
        spans.push(Span::raw(format!(
            "  Step {}/{} ({state})",
            (playback.position() + 1).min(playback.len()),
            playback.len()
        )));
    }
    spans.push(Span::raw(" "));
    Block::new()
        .title(Line::from(spans))
        .title_alignment(Alignment::Center)
}

fn render_canvas(frame: &mut Frame, app: &App, area: Rect) {
    let graph = app.graph();
    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Line::from(vec![Span::from(" Graph ").style(Style::default().bold())])),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, 1.0])
        .y_bounds([0.0, 1.0])
        .paint(move |ctx| {
            // canvas y grows upwards, positions grow downwards
            for edge in graph.edges() {
                let (Some(a), Some(b)) = (graph.vertex(edge.from()), graph.vertex(edge.to())) else {
                    continue;
                };
                let (a, b) = (a.position(), b.position());
                ctx.draw(&CanvasLine::new(
                    a.x,
                    1.0 - a.y,
                    b.x,
                    1.0 - b.y,
                    edge_color(edge_highlight(app, &edge)),
                ));
            }
            ctx.layer();
            for edge in graph.edges() {
                let mirrored = graph.contains_edge(edge.to(), edge.from());
                if edge.cost().is_nan() || (mirrored && edge.from() > edge.to()) {
                    continue;
                }
                let (Some(a), Some(b)) = (graph.vertex(edge.from()), graph.vertex(edge.to())) else {
                    continue;
                };
                let (a, b) = (a.position(), b.position());
                ctx.print(
                    (a.x + b.x) / 2.0,
                    1.0 - (a.y + b.y) / 2.0,
                    Span::styled(format_cost(edge.cost()), Style::default().fg(Color::Gray)),
                );
            }
            for (id, vertex) in graph.vertices() {
                let p = vertex.position();
                let color = vertex_color(vertex_highlight(app, id));
                ctx.print(
                    p.x,
                    1.0 - p.y,
                    Span::styled(format!("●{id}"), Style::default().fg(color).bold()),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn build_vertex_table(app: &'_ App) -> Table<'_> {
    let graph = app.graph();
    Table::new(
        graph.vertices().map(|(id, vertex)| {
            let dist = app
                .dijkstra()
                .and_then(|d| d.distance(id))
                .map(|d| format!("{d:>6}"))
                .unwrap_or_else(|| format!("{:>6}", "-"));
            Row::new(vec![
                Cell::from(id.to_string())
                    .style(Style::default().fg(vertex_color(vertex_highlight(app, id)))),
                Cell::from(if vertex.has_cost() {
                    format!("{:>6}", vertex.cost())
                } else {
                    format!("{:>6}", "-")
                }),
                Cell::from(format!("{:>4}", graph.outgoing(id).count())),
                Cell::from(dist),
            ])
        }),
        [
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new([
            Cell::from("ID"),
            Cell::from("  Cost"),
            Cell::from(" Out"),
            Cell::from("  Dist"),
        ])
        .style(Style::default().bg(Color::DarkGray).fg(White)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::from(" Vertices ").style(Style::default().bold())]))
            .padding(Padding::horizontal(1)),
    )
}

fn build_footer(app: &'_ App) -> Paragraph<'_> {
    match app.price() {
        Some(input) => {
            let target = match input.request {
                PriceRequest::Vertex(id) => format!("vertex {id}"),
                PriceRequest::Edge(from, to) => format!("edge {from}->{to}"),
            };
            Paragraph::new(Line::from(vec![
                Span::raw(format!(" Price for {target}: ")).style(Style::default().bold()),
                Span::raw(format!("{}_", input.buffer)),
            ]))
        }
        None => Paragraph::new(Line::from(
            Span::raw(format!(" {}", app.status())).style(Style::default().add_modifier(Modifier::DIM)),
        )),
    }
}
