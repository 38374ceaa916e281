use flowcanvas::{Canvas, Vec2, Viewport};
use serde_json::json;
use std::time::{Duration, Instant};

const PER_ROW: usize = 20;
const PITCH_X: f32 = 320.0;
const PITCH_Y: f32 = 160.0;

struct Opts {
    nodes: usize,
    rounds: usize,
    budget_us: Option<u64>,
}

fn parse_opts() -> Opts {
    let mut o = Opts { nodes: 2000, rounds: 500, budget_us: None };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let Some(val) = it.next() else { break };
        match flag.as_str() {
            "--nodes" => o.nodes = val.parse().unwrap_or(o.nodes),
            "--rounds" => o.rounds = val.parse().unwrap_or(o.rounds),
            "--budget-us" => o.budget_us = val.parse().ok(),
            other => eprintln!("ignoring unknown flag {}", other),
        }
    }
    o
}

/// Unwired grid of tool nodes with one input and one output each.
fn grid_canvas(count: usize) -> Canvas {
    let nodes: Vec<_> = (0..count)
        .map(|k| {
            let (x, y) = node_origin(k);
            json!({
                "id": format!("n{}", k), "kind": "tool",
                "position": { "x": x, "y": y },
                "inputs": [{ "id": "in", "label": "in" }],
                "outputs": [{ "id": "out", "label": "out" }]
            })
        })
        .collect();
    let mut c = Canvas::new();
    if let Err(e) = c.assemble_json(json!({ "nodes": nodes, "edges": [] })) {
        eprintln!("assemble failed: {}", e);
        std::process::exit(2);
    }
    c.set_viewport(Viewport { width: 1920.0, height: 1080.0, ..Viewport::default() });
    c
}

fn node_origin(k: usize) -> (f32, f32) {
    ((k % PER_ROW) as f32 * PITCH_X, (k / PER_ROW) as f32 * PITCH_Y)
}

fn port_point(c: &Canvas, k: usize, output: bool) -> Vec2 {
    let (x, y) = node_origin(k);
    let layout = &c.config().layout;
    let dx = if output { layout.node_width } else { 0.0 };
    Vec2::new(x + dx, y + layout.header_height + layout.port_row_height * 0.5)
}

#[derive(Default)]
struct Gesture {
    samples: Vec<Duration>,
    hits: usize,
}

impl Gesture {
    fn time(&mut self, f: impl FnOnce() -> bool) {
        let t0 = Instant::now();
        if f() {
            self.hits += 1;
        }
        self.samples.push(t0.elapsed());
    }

    fn mean(&self) -> Duration {
        let n = self.samples.len().max(1) as u32;
        self.samples.iter().sum::<Duration>() / n
    }

    fn worst(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or_default()
    }

    fn report(&self, name: &str) {
        println!(
            "{:<8} n={:<6} hits={:<6} mean_us={:<9.2} worst_us={:.2}",
            name,
            self.samples.len(),
            self.hits,
            self.mean().as_secs_f64() * 1e6,
            self.worst().as_secs_f64() * 1e6
        );
    }
}

fn main() {
    let opts = parse_opts();
    if opts.nodes < 2 {
        eprintln!("need at least two nodes");
        std::process::exit(2);
    }
    let mut c = grid_canvas(opts.nodes);

    let (mut hover, mut connect, mut delete, mut click) =
        (Gesture::default(), Gesture::default(), Gesture::default(), Gesture::default());
    for r in 0..opts.rounds {
        let k = r % (opts.nodes - 1);
        if (k + 1) % PER_ROW == 0 {
            continue;
        }
        let (from, to) = (port_point(&c, k, true), port_point(&c, k + 1, false));

        let mut made = None;
        connect.time(|| {
            if !c.pointer_down(from) {
                return false;
            }
            for s in 1..=8 {
                let t = s as f32 / 8.0;
                c.pointer_move(Vec2::new(from.x + (to.x - from.x) * t, from.y));
            }
            made = c.pointer_up(to).and_then(|o| o.connection().map(|conn| conn.id.clone()));
            made.is_some()
        });

        // sweep across the new connection, then off it again
        let mid = Vec2::new((from.x + to.x) * 0.5, from.y);
        hover.time(|| {
            let on = c.pointer_move(mid);
            c.pointer_move(Vec2::new(mid.x, mid.y + PITCH_Y * 0.5));
            on
        });

        let (bx, by) = node_origin(k);
        click.time(|| c.click(Vec2::new(bx + 120.0, by + 20.0)) == flowcanvas::ClickOutcome::Selected);

        if let Some(id) = made {
            delete.time(|| c.delete_connection(&id));
        }
        c.drain_events();
    }

    println!("nodes={} rounds={}", opts.nodes, opts.rounds);
    connect.report("connect");
    hover.report("hover");
    click.report("click");
    delete.report("delete");
    if let Some(budget) = opts.budget_us {
        let mean = connect.mean().as_micros() as u64;
        if mean > budget {
            eprintln!("connect gesture mean {} us over budget {} us", mean, budget);
            std::process::exit(1);
        }
    }
}
