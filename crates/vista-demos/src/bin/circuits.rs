//! Logic-circuit demo: a battery drives components over glowing wires.
//!
//! Signal values propagate every frame; wire color and glow follow the
//! carried value. Drag to pan, scroll to zoom, Escape quits.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Result, ensure};

use vista_engine::coords::{Bounds, Vec2};
use vista_engine::error::Result as EngineResult;
use vista_engine::input::Key;
use vista_engine::logging::{LoggingConfig, init_logging};
use vista_engine::paint::Color;
use vista_engine::scene::shapes::Wire;
use vista_engine::scene::{Renderable, Scene};
use vista_engine::surface::RenderSurface;
use vista_engine::window::{App, AppControl, Runtime, RuntimeConfig};

/// Vertical spacing between ports, in world units.
const PORT_GAP: f32 = 24.0;
const PORT_RADIUS: f32 = 4.0;

const WIRE_OFF: Color = Color::from_premul(0.31, 0.27, 0.38, 1.0);
const WIRE_ON: Color = Color::from_premul(0.16, 0.73, 1.0, 1.0);

/// Drawable body of a circuit component: a block with port dots along its
/// input and output edges.
struct ComponentBody {
    position: Vec2,
    color: Color,
    width: f32,
    height: f32,
    num_inputs: usize,
    num_outputs: usize,
}

impl ComponentBody {
    fn new(position: Vec2, color: Color, num_inputs: usize, num_outputs: usize, width: f32) -> Self {
        let rows = num_inputs.max(num_outputs) as f32;
        Self {
            position,
            color,
            width,
            height: (rows + 1.0) * PORT_GAP,
            num_inputs,
            num_outputs,
        }
    }

    fn input_position(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.position.x,
            self.position.y + (index as f32 + 1.0) * PORT_GAP,
        )
    }

    fn output_position(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.position.x + self.width,
            self.position.y + (index as f32 + 1.0) * PORT_GAP,
        )
    }
}

impl Renderable for ComponentBody {
    fn bounding_box(&self) -> Bounds {
        Bounds::from_origin_size(self.position, Vec2::new(self.width, self.height))
    }

    fn render(&self, surface: &mut dyn RenderSurface, offset: Vec2, scale: Vec2) -> EngineResult<()> {
        let origin = (self.position + offset) * scale;
        surface.fill_rect(
            vista_engine::coords::Rect::from_origin_size(
                origin,
                Vec2::new(self.width, self.height) * scale,
            ),
            self.color,
        )?;

        // Port dots at half strength along both edges.
        let dot = self.color.faded(0.5);
        let radius = PORT_RADIUS * scale.x;
        for i in 0..self.num_inputs {
            let center = (self.input_position(i) + offset) * scale;
            surface.fill_circle(center, radius, dot)?;
        }
        for i in 0..self.num_outputs {
            let center = (self.output_position(i) + offset) * scale;
            surface.fill_circle(center, radius, dot)?;
        }
        Ok(())
    }
}

/// A component in the circuit graph; `source` is set for batteries.
struct Component {
    body: Rc<RefCell<ComponentBody>>,
    inputs: Vec<Option<usize>>,
    outputs: Vec<Option<usize>>,
    source: Option<f32>,
}

/// A directed connection carrying a 0..=1 signal over a wire element.
struct Connection {
    wire: Rc<RefCell<Wire>>,
    state: f32,
}

impl Connection {
    fn set_state(&mut self, state: f32) {
        let state = state.clamp(0.0, 1.0);
        if state == self.state {
            return;
        }
        self.state = state;

        let mut wire = self.wire.borrow_mut();
        wire.set_color(WIRE_OFF.mix(WIRE_ON, state));
        wire.set_glow(state);
    }
}

#[derive(Default)]
struct CircuitGraph {
    components: Vec<Component>,
    connections: Vec<Connection>,
}

impl CircuitGraph {
    fn add_component(
        &mut self,
        scene: &mut Scene,
        position: Vec2,
        color: Color,
        num_inputs: usize,
        num_outputs: usize,
        width: f32,
        source: Option<f32>,
    ) -> Result<usize> {
        let body = scene.insert(ComponentBody::new(
            position,
            color,
            num_inputs,
            num_outputs,
            width,
        ))?;
        self.components.push(Component {
            body,
            inputs: vec![None; num_inputs],
            outputs: vec![None; num_outputs],
            source,
        });
        Ok(self.components.len() - 1)
    }

    /// Wires an output port of one component to an input port of another.
    fn connect(
        &mut self,
        scene: &mut Scene,
        from: usize,
        output_index: usize,
        to: usize,
        input_index: usize,
    ) -> Result<()> {
        ensure!(from < self.components.len(), "source component {from} is not in the circuit");
        ensure!(to < self.components.len(), "target component {to} is not in the circuit");
        ensure!(
            output_index < self.components[from].outputs.len(),
            "output index {output_index} is out of bounds"
        );
        ensure!(
            input_index < self.components[to].inputs.len(),
            "input index {input_index} is out of bounds"
        );
        ensure!(
            self.components[from].outputs[output_index].is_none(),
            "output {output_index} is already connected"
        );
        ensure!(
            self.components[to].inputs[input_index].is_none(),
            "input {input_index} is already connected"
        );

        let from_pos = self.components[from].body.borrow().output_position(output_index);
        let to_pos = self.components[to].body.borrow().input_position(input_index);

        // Bend at the midpoint so the wire runs in right angles.
        let mut path = Vec::new();
        if from_pos.y != to_pos.y {
            let bend_x = (from_pos.x + to_pos.x) / 2.0;
            path.push(Vec2::new(bend_x, from_pos.y));
            path.push(Vec2::new(bend_x, to_pos.y));
        }

        let wire = scene.insert(Wire::new(from_pos, to_pos, path, WIRE_OFF))?;

        let connection_index = self.connections.len();
        self.connections.push(Connection { wire, state: 0.0 });
        self.components[from].outputs[output_index] = Some(connection_index);
        self.components[to].inputs[input_index] = Some(connection_index);
        Ok(())
    }

    /// Pushes signal values through the graph: batteries drive their outputs,
    /// every other component forwards the maximum of its inputs. Relaxation
    /// runs once per component, enough for any acyclic wiring.
    fn propagate(&mut self) {
        for _ in 0..self.components.len() {
            for component in &self.components {
                let drive = match component.source {
                    Some(value) => value,
                    None => component
                        .inputs
                        .iter()
                        .flatten()
                        .map(|&idx| self.connections[idx].state)
                        .fold(0.0, f32::max),
                };

                for &output in component.outputs.iter().flatten() {
                    self.connections[output].set_state(drive);
                }
            }
        }
    }

    fn set_source(&mut self, component: usize, value: f32) {
        if let Some(c) = self.components.get_mut(component) {
            if c.source.is_some() {
                c.source = Some(value.clamp(0.0, 1.0));
            }
        }
    }
}

struct Circuits {
    graph: CircuitGraph,
    battery: usize,
    elapsed: f32,
}

impl App for Circuits {
    fn build(&mut self, scene: &mut Scene) -> Result<()> {
        let body_color = Color::from_srgb_u8(0x2b, 0x22, 0x3b, 0xff);

        let gate_a = self.graph.add_component(
            scene,
            Vec2::new(600.0, 200.0),
            body_color,
            2,
            1,
            100.0,
            None,
        )?;
        let gate_b = self.graph.add_component(
            scene,
            Vec2::new(800.0, 100.0),
            body_color,
            1,
            1,
            100.0,
            None,
        )?;
        self.battery = self.graph.add_component(
            scene,
            Vec2::new(400.0, 100.0),
            Color::from_srgb_u8(0x29, 0x42, 0x27, 0xff),
            0,
            1,
            100.0,
            Some(1.0),
        )?;

        self.graph.connect(scene, self.battery, 0, gate_a, 0)?;
        self.graph.connect(scene, gate_a, 0, gate_b, 0)?;
        Ok(())
    }

    fn update(&mut self, dt: f32) -> AppControl {
        self.elapsed += dt;
        // The battery breathes between 0 and 1.
        let value = (self.elapsed.sin() + 1.0) / 2.0;
        self.graph.set_source(self.battery, value);
        self.graph.propagate();
        AppControl::Continue
    }

    fn key_pressed(&mut self, key: Key) -> AppControl {
        match key {
            Key::Escape => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "vista - circuits".to_string(),
            show_frame_rate: true,
            clear_color: Color::from_srgb_u8(0x17, 0x14, 0x20, 0xff),
            ..Default::default()
        },
        Circuits {
            graph: CircuitGraph::default(),
            battery: 0,
            elapsed: 0.0,
        },
    )
}
