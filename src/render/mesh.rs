use super::shader::{LineProgram, POSITION_LOCATION};
use super::style::Rgba;
use crate::geometry::RestartIndex;
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlVertexArrayObject};

/// Index widths that can be uploaded as an element buffer.
///
/// WebGL2 always restarts strips on the maximum index of the element type,
/// which is exactly `RestartIndex::RESTART`.
pub trait GlIndex: RestartIndex {
    const GL_TYPE: u32;

    fn to_js_array(indices: &[Self]) -> js_sys::Object;
}

impl GlIndex for u16 {
    const GL_TYPE: u32 = Gl::UNSIGNED_SHORT;

    fn to_js_array(indices: &[Self]) -> js_sys::Object {
        js_sys::Uint16Array::from(indices).into()
    }
}

impl GlIndex for u32 {
    const GL_TYPE: u32 = Gl::UNSIGNED_INT;

    fn to_js_array(indices: &[Self]) -> js_sys::Object {
        js_sys::Uint32Array::from(indices).into()
    }
}

/// Upload a position buffer that one or more meshes can share
///
/// # Errors
///
/// Returns an error if the buffer cannot be created.
pub fn upload_positions(gl: &Gl, positions: &[f32]) -> Result<WebGlBuffer, String> {
    let buffer = gl.create_buffer().ok_or("Failed to create vertex buffer")?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    let data = js_sys::Float32Array::from(positions);
    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &data, Gl::STATIC_DRAW);
    gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    Ok(buffer)
}

/// One index buffer drawn as restart-separated line strips
pub struct LineMesh {
    vao: WebGlVertexArrayObject,
    index_buffer: WebGlBuffer,
    index_count: i32,
    index_type: u32,
    pub color: Rgba,
}

impl LineMesh {
    /// # Errors
    ///
    /// Returns an error if GL objects cannot be created or the index count
    /// does not fit a draw call.
    pub fn new<I: GlIndex>(
        gl: &Gl,
        positions: &WebGlBuffer,
        indices: &[I],
        color: Rgba,
    ) -> Result<Self, String> {
        let index_count = i32::try_from(indices.len())
            .map_err(|_| format!("Too many indices for one draw call: {}", indices.len()))?;

        let vao = gl.create_vertex_array().ok_or("Failed to create vertex array")?;
        gl.bind_vertex_array(Some(&vao));

        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(positions));
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        gl.vertex_attrib_pointer_with_i32(POSITION_LOCATION, 3, Gl::FLOAT, false, 0, 0);

        let Some(index_buffer) = gl.create_buffer() else {
            gl.bind_vertex_array(None);
            gl.delete_vertex_array(Some(&vao));
            return Err("Failed to create index buffer".to_string());
        };
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        gl.buffer_data_with_array_buffer_view(
            Gl::ELEMENT_ARRAY_BUFFER,
            &I::to_js_array(indices),
            Gl::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);

        Ok(Self {
            vao,
            index_buffer,
            index_count,
            index_type: I::GL_TYPE,
            color,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }

    /// Draw with the program already bound and its view-projection set
    pub fn draw(&self, gl: &Gl, program: &LineProgram, z_offset: f32) {
        if self.is_empty() {
            return;
        }
        gl.uniform3f(Some(&program.offset), 0.0, 0.0, z_offset);
        gl.uniform4fv_with_f32_array(Some(&program.color), &self.color);
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_elements_with_i32(Gl::LINE_STRIP, self.index_count, self.index_type, 0);
        gl.bind_vertex_array(None);
    }

    pub fn delete(&self, gl: &Gl) {
        gl.delete_buffer(Some(&self.index_buffer));
        gl.delete_vertex_array(Some(&self.vao));
    }
}
