//! One WebGL2 canvas drawing a section's background image through the
//! distortion shader.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, HtmlImageElement, WebGl2RenderingContext as GL, WebGlProgram, WebGlShader,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject, Window,
};

use crate::config::SiteConfig;
use crate::distortion::{DisplayedDistortion, DistortionState};
use crate::error::SiteError;
use crate::shader::{CoverFit, Uniforms, FLIP_Y_ON_UPLOAD, FRAGMENT_SHADER, QUAD, VERTEX_SHADER};

struct Locations {
    time: Option<WebGlUniformLocation>,
    distortion: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    uv_scale: Option<WebGlUniformLocation>,
    uv_offset: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
}

pub struct Compositor {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    texture: WebGlTexture,
    locations: Locations,
    /// Natural size of the image once it has loaded.
    image_size: Rc<Cell<Option<(f64, f64)>>>,
    shown: DisplayedDistortion,
    max_pixel_ratio: f64,
    _image: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl Compositor {
    pub fn new(canvas: HtmlCanvasElement, image_src: &str, config: &SiteConfig) -> Result<Self, JsValue> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or_else(|| SiteError::WebGl("WebGL2 not supported".into()))?
            .dyn_into()?;

        let vert = compile_shader(&gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let frag = compile_shader(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vert, &frag)?;
        gl.use_program(Some(&program));

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SiteError::WebGl("failed to create vertex array".into()))?;
        gl.bind_vertex_array(Some(&vao));
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| SiteError::WebGl("failed to create buffer".into()))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let vertices = js_sys::Float32Array::from(&QUAD[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
        let position = gl.get_attrib_location(&program, "a_position");
        if position >= 0 {
            gl.enable_vertex_attrib_array(position as u32);
            gl.vertex_attrib_pointer_with_i32(position as u32, 2, GL::FLOAT, false, 0, 0);
        }

        let texture = gl
            .create_texture()
            .ok_or_else(|| SiteError::WebGl("failed to create texture".into()))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, i32::from(FLIP_Y_ON_UPLOAD));
        // Black until the image arrives.
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            GL::RGBA as i32,
            1,
            1,
            0,
            GL::RGBA,
            GL::UNSIGNED_BYTE,
            Some(&[0, 0, 0, 255]),
        )?;
        for (param, value) in [
            (GL::TEXTURE_MIN_FILTER, GL::LINEAR),
            (GL::TEXTURE_MAG_FILTER, GL::LINEAR),
            (GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE),
            (GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameteri(GL::TEXTURE_2D, param, value as i32);
        }

        let locations = Locations {
            time: gl.get_uniform_location(&program, "u_time"),
            distortion: gl.get_uniform_location(&program, "u_distortion"),
            direction: gl.get_uniform_location(&program, "u_direction"),
            uv_scale: gl.get_uniform_location(&program, "u_uv_scale"),
            uv_offset: gl.get_uniform_location(&program, "u_uv_offset"),
            texture: gl.get_uniform_location(&program, "u_texture"),
        };

        let image = HtmlImageElement::new()?;
        let image_size = Rc::new(Cell::new(None));
        let onload = {
            let gl = gl.clone();
            let texture = texture.clone();
            let image = image.clone();
            let image_size = image_size.clone();
            Closure::wrap(Box::new(move || {
                gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
                match gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                    GL::TEXTURE_2D,
                    0,
                    GL::RGBA as i32,
                    GL::RGBA,
                    GL::UNSIGNED_BYTE,
                    &image,
                ) {
                    Ok(()) => image_size.set(Some((image.natural_width() as f64, image.natural_height() as f64))),
                    Err(err) => log::warn!("texture upload failed for {}: {err:?}", image.src()),
                }
            }) as Box<dyn FnMut()>)
        };
        let onerror = {
            let src = image_src.to_owned();
            Closure::wrap(Box::new(move || log::warn!("failed to load {src}")) as Box<dyn FnMut()>)
        };
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        image.set_src(image_src);

        Ok(Self {
            canvas,
            gl,
            program,
            vao,
            texture,
            locations,
            image_size,
            shown: DisplayedDistortion::new(config.intensity_blend, config.direction_blend),
            max_pixel_ratio: config.max_pixel_ratio,
            _image: image,
            _onload: onload,
            _onerror: onerror,
        })
    }

    /// Matches the drawing buffer to the canvas' CSS size.
    pub fn resize(&self, window: &Window) {
        let ratio = window.device_pixel_ratio().min(self.max_pixel_ratio).max(1.0);
        let width = (self.canvas.client_width() as f64 * ratio).round() as u32;
        let height = (self.canvas.client_height() as f64 * ratio).round() as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }

    /// Low-passes toward `target`, then draws if the canvas is on screen.
    pub fn render(&mut self, time: f32, target: DistortionState, viewport_height: f64) {
        self.shown.step(target);

        let rect = self.canvas.get_bounding_client_rect();
        if rect.bottom() < 0.0 || rect.top() > viewport_height {
            return;
        }

        let (width, height) = (self.canvas.width(), self.canvas.height());
        let fit = match self.image_size.get() {
            Some((w, h)) => CoverFit::new(width as f64, height as f64, w, h),
            None => CoverFit::default(),
        };
        let uniforms = Uniforms::new(time, &self.shown, fit);

        let gl = &self.gl;
        gl.viewport(0, 0, width as i32, height as i32);
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.active_texture(GL::TEXTURE0);
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));

        let l = &self.locations;
        gl.uniform1i(l.texture.as_ref(), 0);
        gl.uniform1f(l.time.as_ref(), uniforms.time);
        gl.uniform1f(l.distortion.as_ref(), uniforms.distortion);
        gl.uniform2f(l.direction.as_ref(), uniforms.direction[0], uniforms.direction[1]);
        gl.uniform2f(l.uv_scale.as_ref(), uniforms.uv_scale[0], uniforms.uv_scale[1]);
        gl.uniform2f(l.uv_offset.as_ref(), uniforms.uv_offset[0], uniforms.uv_offset[1]);
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, SiteError> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| SiteError::WebGl("failed to create shader".into()))?;
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
        Err(SiteError::WebGl(format!("shader compile failed: {info}")))
    }
}

fn link_program(gl: &GL, vert: &WebGlShader, frag: &WebGlShader) -> Result<WebGlProgram, SiteError> {
    let program = gl
        .create_program()
        .ok_or_else(|| SiteError::WebGl("failed to create program".into()))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        Err(SiteError::WebGl(format!("program link failed: {info}")))
    }
}
