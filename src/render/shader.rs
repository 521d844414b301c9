use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader, WebGlUniformLocation};

const LINE_VERTEX_SHADER: &str = r"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_view_projection;
uniform vec3 u_offset;
void main() {
    gl_Position = u_view_projection * vec4(a_position + u_offset, 1.0);
}
";

const LINE_FRAGMENT_SHADER: &str = r"#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 frag_color;
void main() {
    frag_color = u_color;
}
";

/// Attribute slot of the vertex position, fixed by the shader's layout qualifier
pub const POSITION_LOCATION: u32 = 0;

/// Flat-coloured line program with a per-draw translation
pub struct LineProgram {
    pub program: WebGlProgram,
    pub view_projection: WebGlUniformLocation,
    pub offset: WebGlUniformLocation,
    pub color: WebGlUniformLocation,
}

impl LineProgram {
    /// Compile and link the line shaders
    ///
    /// # Errors
    ///
    /// Returns the driver's info log if compilation or linking fails.
    pub fn new(gl: &Gl) -> Result<Self, String> {
        let vertex = compile_shader(gl, Gl::VERTEX_SHADER, LINE_VERTEX_SHADER)?;
        let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, LINE_FRAGMENT_SHADER)?;
        let program = link_program(gl, &vertex, &fragment)?;
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));

        let uniform = |name: &str| {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| format!("Missing uniform {name}"))
        };
        Ok(Self {
            view_projection: uniform("u_view_projection")?,
            offset: uniform("u_offset")?,
            color: uniform("u_color")?,
            program,
        })
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, String> {
    let shader = gl.create_shader(kind).ok_or("Failed to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(format!("Shader compilation failed: {log}"))
    }
}

fn link_program(
    gl: &Gl,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, String> {
    let program = gl.create_program().ok_or("Failed to create program")?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(format!("Program link failed: {log}"))
    }
}
