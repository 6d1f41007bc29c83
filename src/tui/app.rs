use crate::algorithm::dijkstra::Dijkstra;
use crate::algorithm::playback::Playback;
use crate::algorithm::step::GraphStep;
use crate::codec::codec;
use crate::edit::mode::{EditMode, PriceRequest, Selection, TouchOutcome};
use crate::graph::editor::{EditPolicy, GraphEditor};
use crate::graph::finder::VertexFinder;
use crate::graph::graph::Graph;
use crate::graph::vertex::{Point, VertexId};
use crate::scenario::scenario::Scenario;
use crossterm::event::{DisableMouseCapture, KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Touch radius in normalized canvas units.
const HIT_RADIUS: f64 = 0.04;

pub struct PriceInput {
    pub request: PriceRequest,
    pub buffer: String,
}

pub struct App {
    graph: Graph,
    selection: Selection,
    policy: EditPolicy,
    mode: EditMode,
    price: Option<PriceInput>,
    grabbed: Option<VertexId>,
    dijkstra: Option<Dijkstra>,
    playback: Option<Playback>,
    delay: Duration,
    save_path: PathBuf,
    status: String,
    pub running: bool,
}

impl App {
    pub fn new(scenario: Scenario, policy: EditPolicy, delay: Duration, save_path: PathBuf) -> Self {
        Self {
            graph: scenario.graph,
            selection: scenario.selection,
            policy,
            mode: EditMode::AddVertex,
            price: None,
            grabbed: None,
            dijkstra: None,
            playback: None,
            delay,
            save_path,
            status: "v e x c s t: modes   r: run   w: save   q: quit".to_string(),
            running: true,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    pub fn price(&self) -> Option<&PriceInput> {
        self.price.as_ref()
    }

    pub fn dijkstra(&self) -> Option<&Dijkstra> {
        self.dijkstra.as_ref()
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    pub fn current_step(&self) -> Option<&GraphStep> {
        self.playback.as_ref().and_then(|p| p.current())
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(playback) = self.playback.as_mut() {
            playback.tick(now);
        }
    }

    pub fn on_key(&mut self, code: KeyCode, now: Instant) {
        if self.price.is_some() {
            self.on_price_key(code);
            return;
        }
        match code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('v') => self.switch_mode(EditMode::AddVertex),
            KeyCode::Char('e') => self.switch_mode(EditMode::AddEdge { pending: None }),
            KeyCode::Char('x') => self.switch_mode(EditMode::Remove),
            KeyCode::Char('c') => self.switch_mode(EditMode::SetPrice),
            KeyCode::Char('s') => self.switch_mode(EditMode::SelectStart),
            KeyCode::Char('t') => self.switch_mode(EditMode::SelectEnd),
            KeyCode::Char('b') => {
                self.policy = match self.policy {
                    EditPolicy::Directed => EditPolicy::Bidirectional,
                    EditPolicy::Bidirectional => EditPolicy::Directed,
                };
                self.status = format!("edges are now {:?}", self.policy).to_lowercase();
            }
            KeyCode::Char('r') | KeyCode::Enter => self.run(now),
            KeyCode::Char('p') => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.toggle_pause(now);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(playback) = self.playback.as_mut() {
                    playback.step_forward();
                }
            }
            KeyCode::Char('w') => self.save(),
            KeyCode::Esc => {
                self.stop_playback();
                if let EditMode::AddEdge { .. } = self.mode {
                    self.mode = EditMode::AddEdge { pending: None };
                }
            }
            _ => {}
        }
    }

    /// `canvas` is the inner area the graph is drawn into. A press touches
    /// the graph in the current mode, then dragging moves the vertex under
    /// the cursor.
    pub fn on_mouse(&mut self, event: MouseEvent, canvas: Rect) {
        if self.price.is_some() {
            return;
        }
        let point = to_canvas_point(event.column, event.row, canvas);
        match (event.kind, point) {
            (MouseEventKind::Down(MouseButton::Left), Some(point)) => {
                self.touch(point);
                self.grabbed = VertexFinder::new(HIT_RADIUS).find(point, &self.graph);
            }
            (MouseEventKind::Drag(MouseButton::Left), Some(point)) => {
                if let Some(id) = self.grabbed {
                    if !self.graph.set_vertex_position(id, point) {
                        self.grabbed = None;
                    }
                }
            }
            (MouseEventKind::Up(MouseButton::Left), _) => self.grabbed = None,
            _ => {}
        }
    }

    pub fn touch(&mut self, point: Point) {
        self.stop_playback();
        let mut editor = GraphEditor::new(&mut self.graph, self.policy);
        let outcome = self
            .mode
            .on_touch(point, HIT_RADIUS, &mut editor, &mut self.selection);
        self.status = match outcome {
            Ok(TouchOutcome::Ignored) => return,
            Ok(TouchOutcome::VertexAdded(id)) => format!("added vertex {id}"),
            Ok(TouchOutcome::EdgeSourcePicked(id)) => format!("edge from {id}, pick the target"),
            Ok(TouchOutcome::EdgesAdded(edges)) => format!("added {} edge(s)", edges.len()),
            Ok(TouchOutcome::VertexRemoved { id, edges }) => {
                format!("removed vertex {id} and {} edge(s)", edges.len())
            }
            Ok(TouchOutcome::EdgesRemoved(edges)) => format!("removed {} edge(s)", edges.len()),
            Ok(TouchOutcome::PriceRequested(request)) => {
                self.price = Some(PriceInput {
                    request,
                    buffer: String::new(),
                });
                "type a price, Enter to apply, Esc to cancel".to_string()
            }
            Ok(TouchOutcome::SelectionChanged) => format!(
                "start {:?}  end {:?}",
                self.selection.start, self.selection.end
            ),
            Err(e) => {
                warn!(error = %e, "edit rejected");
                e.to_string()
            }
        };
    }

    fn on_price_key(&mut self, code: KeyCode) {
        let Some(input) = self.price.as_mut() else {
            return;
        };
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => input.buffer.push(c),
            KeyCode::Backspace => {
                input.buffer.pop();
            }
            KeyCode::Esc => {
                self.price = None;
                self.status = "price unchanged".to_string();
            }
            KeyCode::Enter => {
                let Some(input) = self.price.take() else {
                    return;
                };
                self.status = match input.buffer.parse::<f64>() {
                    Ok(cost) if cost.is_finite() && cost >= 0.0 => {
                        let mut editor = GraphEditor::new(&mut self.graph, self.policy);
                        if input.request.resolve(cost, &mut editor) {
                            format!("price set to {cost}")
                        } else {
                            "nothing to price any more".to_string()
                        }
                    }
                    _ => format!("{:?} is not a price", input.buffer),
                };
            }
            _ => {}
        }
    }

    fn switch_mode(&mut self, mode: EditMode) {
        self.mode = mode;
        self.status = format!("mode: {mode}");
    }

    fn run(&mut self, now: Instant) {
        let dijkstra = Dijkstra::new(
            self.selection.start.iter().copied(),
            self.selection.end.iter().copied(),
            &self.graph,
        );
        let steps = dijkstra.generate();
        self.status = if dijkstra.has_path() {
            format!("path cost {}, {} steps", dijkstra.path_cost(), steps.len())
        } else {
            "no path between start and end".to_string()
        };
        info!(cost = dijkstra.path_cost(), steps = steps.len(), "playback started");
        self.playback = Some(Playback::new(steps, self.delay, now));
        self.dijkstra = Some(dijkstra);
    }

    fn stop_playback(&mut self) {
        if let Some(mut playback) = self.playback.take() {
            playback.cancel();
        }
        self.dijkstra = None;
    }

    fn save(&mut self) {
        self.status = match codec::save(&self.graph, &self.save_path) {
            Ok(()) => format!("saved to {}", self.save_path.display()),
            Err(e) => {
                warn!(error = %e, "save failed");
                e.to_string()
            }
        };
    }
}

/// Maps a terminal cell inside `canvas` to normalized coordinates.
pub fn to_canvas_point(column: u16, row: u16, canvas: Rect) -> Option<Point> {
    if !canvas.contains(ratatui::layout::Position::new(column, row)) {
        return None;
    }
    let span = |len: u16| f64::from(len.saturating_sub(1).max(1));
    Some(Point::new(
        f64::from(column - canvas.x) / span(canvas.width),
        f64::from(row - canvas.y) / span(canvas.height),
    ))
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = crossterm::execute!(io::stdout(), DisableMouseCapture);
        ratatui::restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::playback::PlaybackState;
    use crossterm::event::KeyModifiers;
    use crate::scenario::demo::DemoScenario;
    use approx::assert_relative_eq;

    fn app() -> App {
        App::new(
            DemoScenario::build(),
            EditPolicy::Bidirectional,
            Duration::from_millis(10),
            std::env::temp_dir().join("pathgraph-app-test.txt"),
        )
    }

    #[test]
    fn test_canvas_mapping() {
        let canvas = Rect::new(10, 5, 21, 11);
        let p = to_canvas_point(10, 5, canvas).unwrap();
        assert_relative_eq!(0.0, p.x);
        assert_relative_eq!(0.0, p.y);
        let p = to_canvas_point(30, 15, canvas).unwrap();
        assert_relative_eq!(1.0, p.x);
        assert_relative_eq!(1.0, p.y);
        assert!(to_canvas_point(9, 5, canvas).is_none());
    }

    #[test]
    fn test_run_and_edit_cancels_playback() {
        let mut app = app();
        let now = Instant::now();
        app.on_key(KeyCode::Char('r'), now);
        assert_eq!(Some(PlaybackState::Playing), app.playback().map(|p| p.state()));
        app.tick(now + Duration::from_millis(20));
        assert_eq!(Some(1), app.playback().map(|p| p.position()));

        app.on_key(KeyCode::Char('v'), now);
        app.touch(Point::new(0.5, 0.95));
        assert!(app.playback().is_none());
        assert!(app.graph().contains_vertex(VertexId(7)));
    }

    #[test]
    fn test_price_prompt() {
        let mut app = app();
        let now = Instant::now();
        app.on_key(KeyCode::Char('c'), now);
        app.touch(Point::new(0.08, 0.5));
        assert!(app.price().is_some());
        for c in "2.5".chars() {
            app.on_key(KeyCode::Char(c), now);
        }
        // keys go to the prompt, not to the mode switch
        app.on_key(KeyCode::Char('q'), now);
        assert!(app.running);
        app.on_key(KeyCode::Enter, now);
        assert!(app.price().is_none());
        assert_relative_eq!(2.5, app.graph().vertex(VertexId(0)).unwrap().cost());
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_drag_moves_vertex() {
        let mut app = app();
        let canvas = Rect::new(0, 0, 101, 101);
        app.on_key(KeyCode::Char('s'), Instant::now());
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 8, 50), canvas);
        app.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 90), canvas);
        let moved = app.graph().vertex(VertexId(0)).unwrap().position();
        assert_relative_eq!(0.5, moved.x);
        assert_relative_eq!(0.9, moved.y);

        app.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 50, 90), canvas);
        app.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 20), canvas);
        assert_relative_eq!(0.5, app.graph().vertex(VertexId(0)).unwrap().position().x);
    }

    #[test]
    fn test_price_prompt_rejects_negative_input() {
        let mut app = app();
        let now = Instant::now();
        app.on_key(KeyCode::Char('c'), now);
        app.touch(Point::new(0.08, 0.5));
        for c in "-3".chars() {
            app.on_key(KeyCode::Char(c), now);
        }
        assert_eq!(Some("3"), app.price().map(|p| p.buffer.as_str()));
    }
}
