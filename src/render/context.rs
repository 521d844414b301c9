use super::camera::OrbitCamera;
use super::mesh::{upload_positions, GlIndex, LineMesh};
use super::shader::LineProgram;
use super::style::{
    hour_layer_offsets, kind_color, rgb, BACKGROUND_COLOR, INFRASTRUCTURE_COLOR, TRAIN_COLOR,
};
use crate::config::ViewerConfig;
use crate::geometry::Bounds;
#[allow(unused_imports)]
use crate::logging::log;
use crate::pipeline::{InfrastructureGeometry, InfrastructureStage, TimetableStage};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer};

/// Meshes sharing one uploaded vertex buffer
struct MeshGroup {
    positions: WebGlBuffer,
    meshes: Vec<LineMesh>,
}

impl MeshGroup {
    fn delete(&self, gl: &Gl) {
        for mesh in &self.meshes {
            mesh.delete(gl);
        }
        gl.delete_buffer(Some(&self.positions));
    }
}

/// GL state for one viewport session.
///
/// Created once when the canvas mounts and handed to [`RenderContext::render`]
/// on every animation frame. Meshes added by an earlier pipeline stage stay
/// visible if a later stage fails.
pub struct RenderContext {
    gl: Gl,
    canvas: HtmlCanvasElement,
    program: LineProgram,
    infrastructure: Option<MeshGroup>,
    timetable: Option<MeshGroup>,
    hour_layers: u32,
    bounds: Option<Bounds>,
}

impl RenderContext {
    /// # Errors
    ///
    /// Returns an error if WebGL2 is unavailable or the shaders fail to build.
    pub fn new(canvas: HtmlCanvasElement, config: &ViewerConfig) -> Result<Self, String> {
        let gl = canvas
            .get_context("webgl2")
            .map_err(|_| "Failed to query WebGL2 context")?
            .ok_or("WebGL2 is not supported by this browser")?
            .dyn_into::<Gl>()
            .map_err(|_| "Failed to cast to WebGL2 context")?;
        let program = LineProgram::new(&gl)?;

        let [r, g, b, a] = rgb(BACKGROUND_COLOR);
        gl.clear_color(r, g, b, a);
        gl.enable(Gl::DEPTH_TEST);

        Ok(Self {
            gl,
            canvas,
            program,
            infrastructure: None,
            timetable: None,
            hour_layers: config.hour_layers,
            bounds: None,
        })
    }

    /// Upload infrastructure geometry, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if GL buffers cannot be created.
    pub fn add_infrastructure<I: GlIndex>(
        &mut self,
        stage: &InfrastructureStage<I>,
    ) -> Result<(), String> {
        let positions = upload_positions(&self.gl, stage.geometry.positions())?;
        let meshes = match &stage.geometry {
            InfrastructureGeometry::Single(geometry) => vec![LineMesh::new(
                &self.gl,
                &positions,
                &geometry.indices,
                rgb(INFRASTRUCTURE_COLOR),
            )?],
            InfrastructureGeometry::ByKind(geometry) => geometry
                .buckets
                .iter()
                .map(|(kind, indices)| {
                    LineMesh::new(&self.gl, &positions, indices, kind_color(*kind))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        if let Some(old) = self.infrastructure.replace(MeshGroup { positions, meshes }) {
            old.delete(&self.gl);
        }
        self.extend_bounds(stage.bounds());
        log!("Uploaded infrastructure meshes");
        Ok(())
    }

    /// Upload timetable geometry, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if GL buffers cannot be created.
    pub fn add_timetable<I: GlIndex>(&mut self, stage: &TimetableStage<I>) -> Result<(), String> {
        let positions = upload_positions(&self.gl, &stage.geometry.positions)?;
        let mesh = LineMesh::new(&self.gl, &positions, &stage.geometry.indices, rgb(TRAIN_COLOR))?;

        if let Some(old) = self.timetable.replace(MeshGroup { positions, meshes: vec![mesh] }) {
            old.delete(&self.gl);
        }
        self.extend_bounds(stage.geometry.bounds());
        log!("Uploaded timetable mesh");
        Ok(())
    }

    /// Bounds of everything uploaded so far
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    fn extend_bounds(&mut self, bounds: Option<Bounds>) {
        self.bounds = match (self.bounds, bounds) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (a, b) => a.or(b),
        };
    }

    /// Draw one frame
    pub fn render(&self, camera: &OrbitCamera) {
        let gl = &self.gl;
        let (width, height) = self.resize_to_display();

        gl.viewport(0, 0, width, height);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        #[allow(clippy::cast_precision_loss)]
        let aspect = width as f32 / height.max(1) as f32;
        let view_projection = camera.view_projection(aspect);

        gl.use_program(Some(&self.program.program));
        gl.uniform_matrix4fv_with_f32_array(
            Some(&self.program.view_projection),
            false,
            &view_projection.to_cols_array(),
        );

        if let Some(group) = &self.infrastructure {
            for z_offset in hour_layer_offsets(self.hour_layers) {
                for mesh in &group.meshes {
                    mesh.draw(gl, &self.program, z_offset);
                }
            }
        }
        if let Some(group) = &self.timetable {
            for mesh in &group.meshes {
                mesh.draw(gl, &self.program, 0.0);
            }
        }
    }

    /// Match the drawing buffer to the canvas' CSS size
    fn resize_to_display(&self) -> (i32, i32) {
        // Browser dimensions are always non-negative
        #[allow(clippy::cast_sign_loss)]
        let width = self.canvas.client_width().max(1) as u32;
        #[allow(clippy::cast_sign_loss)]
        let height = self.canvas.client_height().max(1) as u32;

        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        (self.gl.drawing_buffer_width(), self.gl.drawing_buffer_height())
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        for group in [self.infrastructure.take(), self.timetable.take()].into_iter().flatten() {
            group.delete(&self.gl);
        }
        self.gl.delete_program(Some(&self.program.program));
    }
}
