use starburst_core::{DrawSurface, Rgb, Rgba};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlContextAttributes, WebGlProgram,
    WebGlRenderingContext as GL, WebGlShader, WebGlUniformLocation,
};

/// Maps pixel coordinates (origin top-left) to clip space
pub const VERTEX_SHADER: &str = r#"
attribute vec2 a_coords;
uniform float u_width;
uniform float u_height;
void main() {
    float x = -1.0 + 2.0 * (a_coords.x / u_width);
    float y = 1.0 - 2.0 * (a_coords.y / u_height);
    gl_Position = vec4(x, y, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform vec3 u_color;
uniform float u_alpha;
void main() {
    gl_FragColor = vec4(u_color, u_alpha);
}
"#;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not get a WebGL graphics context")]
    ContextUnavailable,

    #[error("Error in vertex shader:  {0}")]
    VertexShader(String),

    #[error("Error in fragment shader:  {0}")]
    FragmentShader(String),

    #[error("Link error in program:  {0}")]
    Link(String),

    #[error("could not create {0}")]
    Resource(&'static str),

    #[error("element #{0} not found")]
    MissingElement(String),

    #[error("WebGL reported error 0x{0:04x}")]
    Draw(u32),

    #[error("{0}")]
    Js(String),
}

impl RenderError {
    /// Markup shown in place of the canvas when setup fails
    pub fn fallback_html(&self) -> String {
        match self {
            RenderError::ContextUnavailable => {
                "<p>Sorry, could not get a WebGL graphics context.</p>".to_string()
            }
            other => format!(
                "<p>Sorry, could not initialize the WebGL graphics context: {}</p>",
                other
            ),
        }
    }
}

impl From<JsValue> for RenderError {
    fn from(value: JsValue) -> Self {
        RenderError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<RenderError> for JsValue {
    fn from(err: RenderError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Get a WebGL 1 context, trying the prefixed name as a fallback.
pub fn acquire_context(canvas: &HtmlCanvasElement) -> Result<GL, RenderError> {
    let options = WebGlContextAttributes::new();
    options.set_alpha(false);
    options.set_depth(false);
    options.set_preserve_drawing_buffer(false);

    for name in ["webgl", "experimental-webgl"] {
        if let Ok(Some(context)) = canvas.get_context_with_context_options(name, &options) {
            if let Ok(gl) = context.dyn_into::<GL>() {
                return Ok(gl);
            }
        }
    }

    Err(RenderError::ContextUnavailable)
}

fn compile_shader(gl: &GL, shader_type: u32, source: &str) -> Result<WebGlShader, String> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| "could not create shader".to_string())?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(gl.get_shader_info_log(&shader).unwrap_or_default())
    }
}

/// Compile both shaders and link them into a program.
pub fn create_program(
    gl: &GL,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<WebGlProgram, RenderError> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_source)
        .map_err(RenderError::VertexShader)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment_source)
        .map_err(RenderError::FragmentShader)?;

    let program = gl
        .create_program()
        .ok_or(RenderError::Resource("shader program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(RenderError::Link(
            gl.get_program_info_log(&program).unwrap_or_default(),
        ))
    }
}

/// Draws triangle fans in pixel coordinates on a WebGL canvas
pub struct WebGlRenderer {
    gl: GL,
    buffer: WebGlBuffer,
    attribute_coords: u32,
    uniform_color: WebGlUniformLocation,
    uniform_alpha: WebGlUniformLocation,
}

impl WebGlRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, RenderError> {
        let gl = acquire_context(canvas)?;
        Self::with_context(gl, canvas.width() as f32, canvas.height() as f32)
    }

    /// Build the shader program and static GL state for a `width` x `height`
    /// surface, leaving it cleared to white.
    pub fn with_context(gl: GL, width: f32, height: f32) -> Result<Self, RenderError> {
        let program = create_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        gl.use_program(Some(&program));

        let attribute_coords = gl.get_attrib_location(&program, "a_coords");
        if attribute_coords < 0 {
            return Err(RenderError::Resource("attribute a_coords"));
        }
        let attribute_coords = attribute_coords as u32;
        let buffer = gl
            .create_buffer()
            .ok_or(RenderError::Resource("vertex buffer"))?;
        gl.enable_vertex_attrib_array(attribute_coords);

        let uniform = |name: &'static str| {
            gl.get_uniform_location(&program, name)
                .ok_or(RenderError::Resource(name))
        };
        let uniform_width = uniform("u_width")?;
        let uniform_height = uniform("u_height")?;
        let uniform_color = uniform("u_color")?;
        let uniform_alpha = uniform("u_alpha")?;

        gl.uniform1f(Some(&uniform_width), width);
        gl.uniform1f(Some(&uniform_height), height);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);

        let mut renderer = Self {
            gl,
            buffer,
            attribute_coords,
            uniform_color,
            uniform_alpha,
        };
        renderer.clear(Rgba::WHITE)?;

        Ok(renderer)
    }

    pub fn context(&self) -> &GL {
        &self.gl
    }

    fn check(&self) -> Result<(), RenderError> {
        match self.gl.get_error() {
            GL::NO_ERROR => Ok(()),
            code => Err(RenderError::Draw(code)),
        }
    }
}

impl DrawSurface for WebGlRenderer {
    type Error = RenderError;

    fn clear(&mut self, color: Rgba) -> Result<(), RenderError> {
        self.gl.clear_color(color.r, color.g, color.b, color.a);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.check()
    }

    fn fill_fan(&mut self, vertices: &[f32], color: Rgb, alpha: f32) -> Result<(), RenderError> {
        self.gl
            .uniform3f(Some(&self.uniform_color), color.r, color.g, color.b);
        self.gl.uniform1f(Some(&self.uniform_alpha), alpha);

        let coords = js_sys::Float32Array::from(vertices);
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.buffer));
        self.gl
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &coords, GL::STREAM_DRAW);
        self.gl
            .vertex_attrib_pointer_with_i32(self.attribute_coords, 2, GL::FLOAT, false, 0, 0);
        self.gl
            .draw_arrays(GL::TRIANGLE_FAN, 0, (vertices.len() / 2) as i32);

        self.check()
    }
}
