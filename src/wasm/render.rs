use cgmath::Matrix4;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
};

use crate::error::{DashboardError, Result};
use crate::geometry::CurvedMesh;
use crate::input::Viewport;
use crate::scene::{FrameUniforms, RenderBackend};

const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 a_position;
in vec2 a_uv;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;

out vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

// Unlit: the HUD texture with a faint scanline drifting with u_time.
const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform sampler2D u_texture;
uniform float u_time;

in vec2 v_uv;
out vec4 out_color;

void main() {
    vec3 hud = texture(u_texture, v_uv).rgb;
    float scan = 0.92 + 0.08 * sin(v_uv.y * 600.0 - u_time);
    out_color = vec4(hud * scan, 1.0);
}
"#;

// EXT_texture_filter_anisotropic
const TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FE;
const MAX_TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FF;

struct Uniforms {
    projection: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
}

/// WebGL2 renderer for the curved surface. Reads the HUD canvas into a
/// texture whenever asked to.
pub struct WebGlBackend {
    canvas: HtmlCanvasElement,
    hud_canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    uniforms: Uniforms,
    texture: WebGlTexture,
    vao: Option<WebGlVertexArrayObject>,
    buffers: Vec<WebGlBuffer>,
    index_count: i32,
    released: bool,
}

fn flat(m: &Matrix4<f32>) -> &[f32; 16] {
    m.as_ref()
}

impl WebGlBackend {
    pub fn new(canvas: HtmlCanvasElement, hud_canvas: HtmlCanvasElement) -> Result<Self> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"antialias".into(), &JsValue::TRUE)
            .map_err(DashboardError::js_err)?;
        js_sys::Reflect::set(&options, &"alpha".into(), &JsValue::FALSE)
            .map_err(DashboardError::js_err)?;

        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)
            .map_err(DashboardError::js_err)?
            .ok_or_else(|| DashboardError::backend("WebGL2 not supported"))?
            .dyn_into()
            .map_err(|_| DashboardError::backend("not a WebGL2 context"))?;

        let vs = compile_shader(&gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let fs = compile_shader(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vs, &fs)?;
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));

        let uniforms = Uniforms {
            projection: gl.get_uniform_location(&program, "u_projection"),
            view: gl.get_uniform_location(&program, "u_view"),
            model: gl.get_uniform_location(&program, "u_model"),
            time: gl.get_uniform_location(&program, "u_time"),
            texture: gl.get_uniform_location(&program, "u_texture"),
        };

        let texture = gl
            .create_texture()
            .ok_or_else(|| DashboardError::backend("failed to create texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
        if let Ok(Some(_)) = gl.get_extension("EXT_texture_filter_anisotropic") {
            let max = gl
                .get_parameter(MAX_TEXTURE_MAX_ANISOTROPY_EXT)
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(1.0);
            gl.tex_parameterf(GL::TEXTURE_2D, TEXTURE_MAX_ANISOTROPY_EXT, max as f32);
        }

        gl.enable(GL::DEPTH_TEST);
        gl.enable(GL::CULL_FACE);
        // Only the inside of the cylinder is visible.
        gl.cull_face(GL::FRONT);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);

        Ok(Self {
            canvas,
            hud_canvas,
            gl,
            program,
            uniforms,
            texture,
            vao: None,
            buffers: Vec::new(),
            index_count: 0,
            released: false,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn upload_attribute(&mut self, name: &str, data: &[u8], components: i32) -> Result<()> {
        let gl = &self.gl;
        let location = gl.get_attrib_location(&self.program, name);
        if location < 0 {
            return Err(DashboardError::backend(format!("attribute {name} not found")));
        }
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| DashboardError::backend("failed to create buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_u8_array(GL::ARRAY_BUFFER, data, GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(location as u32);
        gl.vertex_attrib_pointer_with_i32(location as u32, components, GL::FLOAT, false, 0, 0);
        self.buffers.push(buffer);
        Ok(())
    }
}

impl RenderBackend for WebGlBackend {
    fn upload_mesh(&mut self, mesh: &CurvedMesh) -> Result<()> {
        let vao = self
            .gl
            .create_vertex_array()
            .ok_or_else(|| DashboardError::backend("failed to create vertex array"))?;
        self.gl.bind_vertex_array(Some(&vao));

        self.upload_attribute("a_position", bytemuck::cast_slice(mesh.positions()), 3)?;
        self.upload_attribute("a_uv", bytemuck::cast_slice(mesh.uvs()), 2)?;

        let indices = self
            .gl
            .create_buffer()
            .ok_or_else(|| DashboardError::backend("failed to create index buffer"))?;
        self.gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&indices));
        self.gl.buffer_data_with_u8_array(
            GL::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(mesh.indices()),
            GL::STATIC_DRAW,
        );
        self.buffers.push(indices);

        self.gl.bind_vertex_array(None);
        self.index_count = mesh.indices().len() as i32;
        self.vao = Some(vao);
        Ok(())
    }

    fn resize(&mut self, viewport: &Viewport) {
        let (w, h) = viewport.physical_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        if style.set_property("width", &format!("{}px", viewport.width)).is_err()
            || style.set_property("height", &format!("{}px", viewport.height)).is_err()
        {
            log::warn!("could not set canvas css size");
        }
        self.gl.viewport(0, 0, w as i32, h as i32);
    }

    fn upload_hud(&mut self) -> Result<()> {
        let gl = &self.gl;
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
        gl.tex_image_2d_with_u32_and_u32_and_html_canvas_element(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            &self.hud_canvas,
        )
        .map_err(DashboardError::js_err)
    }

    fn draw(&mut self, u: &FrameUniforms) -> Result<()> {
        if self.released {
            return Ok(());
        }
        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        // A mirrored model matrix reverses winding.
        gl.front_face(if u.mirrored { GL::CW } else { GL::CCW });

        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.projection.as_ref(), false, flat(&u.projection));
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.view.as_ref(), false, flat(&u.view));
        gl.uniform_matrix4fv_with_f32_array(self.uniforms.model.as_ref(), false, flat(&u.model));
        gl.uniform1f(self.uniforms.time.as_ref(), u.time);

        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        gl.uniform1i(self.uniforms.texture.as_ref(), 0);

        gl.bind_vertex_array(self.vao.as_ref());
        gl.draw_elements_with_i32(GL::TRIANGLES, self.index_count, GL::UNSIGNED_INT, 0);
        gl.bind_vertex_array(None);
        Ok(())
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        let gl = &self.gl;
        for buffer in self.buffers.drain(..) {
            gl.delete_buffer(Some(&buffer));
        }
        gl.delete_vertex_array(self.vao.take().as_ref());
        gl.delete_texture(Some(&self.texture));
        gl.delete_program(Some(&self.program));

        match gl.get_extension("WEBGL_lose_context") {
            Ok(Some(ext)) => ext.unchecked_into::<WebglLoseContext>().lose_context(),
            _ => log::warn!("WEBGL_lose_context unavailable; context left to the GC"),
        }
        self.canvas.remove();
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| DashboardError::backend("failed to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(DashboardError::backend(format!("shader compile failed: {info}")))
    }
}

fn link_program(gl: &GL, vs: &WebGlShader, fs: &WebGlShader) -> Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| DashboardError::backend("failed to create program"))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(DashboardError::backend(format!("program link failed: {info}")))
    }
}
