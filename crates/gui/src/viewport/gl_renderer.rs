use std::collections::HashMap;

use glow::HasContext;

use super::mesh::MeshData;
use super::snapshot::{FrameSnapshot, Lighting};
use crate::scene::FlagId;

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

impl GpuMesh {
    unsafe fn delete(&self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
        gl.delete_buffer(self.ibo);
    }
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    plane: Option<GpuMesh>,
    /// Flag meshes keyed by flag ID
    flags: HashMap<FlagId, GpuMesh>,
    /// Group whose meshes are currently uploaded
    uploaded_group: Option<String>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        Ok(Self {
            mesh_program,
            plane: None,
            flags: HashMap::new(),
            uploaded_group: None,
        })
    }

    /// Upload the ground plane once
    fn sync_plane(&mut self, gl: &glow::Context, data: &MeshData) {
        if self.plane.is_some() {
            return;
        }
        match upload_mesh(gl, data) {
            Ok(mesh) => self.plane = Some(mesh),
            Err(e) => tracing::error!("Failed to upload ground plane: {e}"),
        }
    }

    /// Replace uploaded flag meshes when the group changed
    fn sync_flags(&mut self, gl: &glow::Context, snapshot: &FrameSnapshot) {
        if snapshot.group_id == self.uploaded_group {
            return;
        }
        self.uploaded_group = snapshot.group_id.clone();

        for (_, mesh) in self.flags.drain() {
            unsafe { mesh.delete(gl) };
        }

        for (id, data) in snapshot.meshes.iter() {
            if data.is_empty() {
                continue;
            }
            match upload_mesh(gl, data) {
                Ok(mesh) => {
                    self.flags.insert(id.clone(), mesh);
                }
                Err(e) => tracing::error!("Failed to upload flag {id}: {e}"),
            }
        }
        tracing::debug!("Uploaded {} flag meshes", self.flags.len());
    }

    /// Render one snapshot into `viewport` ([x, y, width, height] in pixels)
    pub fn paint(&mut self, gl: &glow::Context, snapshot: &FrameSnapshot, viewport: [f32; 4]) {
        self.sync_plane(gl, &snapshot.plane);
        self.sync_flags(gl, snapshot);

        unsafe {
            gl.viewport(
                viewport[0] as i32,
                viewport[1] as i32,
                viewport[2] as i32,
                viewport[3] as i32,
            );
            gl.scissor(
                viewport[0] as i32,
                viewport[1] as i32,
                viewport[2] as i32,
                viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            let bg = snapshot.background;
            gl.clear_color(
                bg[0] as f32 / 255.0,
                bg[1] as f32 / 255.0,
                bg[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            let program = self.mesh_program;
            gl.use_program(Some(program));
            set_uniform_mat4(gl, program, "u_view_proj", &snapshot.view_projection);
            set_lighting(gl, program, &snapshot.lighting);

            if let Some(plane) = &self.plane {
                set_uniform_mat4(gl, program, "u_model", &glam::Mat4::IDENTITY);
                draw_mesh(gl, plane);
            }

            for flag in &snapshot.flags {
                if let Some(mesh) = self.flags.get(&flag.id) {
                    set_uniform_mat4(gl, program, "u_model", &flag.model);
                    draw_mesh(gl, mesh);
                }
            }

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    pub fn destroy(&mut self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.mesh_program);
            if let Some(plane) = self.plane.take() {
                plane.delete(gl);
            }
            for (_, mesh) in self.flags.drain() {
                mesh.delete(gl);
            }
        }
        self.uploaded_group = None;
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Result<GpuMesh, String> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let vert = gl.create_shader(glow::VERTEX_SHADER)?;
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER)?;
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        if !linked {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if linked {
            Ok(program)
        } else {
            gl.delete_program(program);
            Err("mesh shader failed to link".to_string())
        }
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_f32(gl: &glow::Context, program: glow::Program, name: &str, v: f32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_f32(loc.as_ref(), v);
    }
}

fn set_lighting(gl: &glow::Context, program: glow::Program, lighting: &Lighting) {
    set_uniform_f32(gl, program, "u_ambient", lighting.ambient);
    set_uniform_vec3(gl, program, "u_key_dir", &lighting.key_dir);
    set_uniform_f32(gl, program, "u_key_intensity", lighting.key_intensity);
    set_uniform_vec3(gl, program, "u_point_pos", &lighting.point_position);
    set_uniform_f32(gl, program, "u_point_intensity", lighting.point_intensity);
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_view_proj;
uniform mat4 u_model;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_world;
out vec3 v_normal;
out vec3 v_color;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    gl_Position = u_view_proj * world;
    v_world = world.xyz;
    v_normal = a_normal;
    v_color = a_color;
}
"#;

// Flags are thin sheets seen from both sides, so lighting uses |n.l|.
const MESH_FRAG: &str = r#"#version 330 core
uniform float u_ambient;
uniform vec3 u_key_dir;
uniform float u_key_intensity;
uniform vec3 u_point_pos;
uniform float u_point_intensity;

in vec3 v_world;
in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float key = abs(dot(n, normalize(u_key_dir))) * u_key_intensity;
    vec3 to_point = u_point_pos - v_world;
    float falloff = 1.0 / (1.0 + 0.2 * dot(to_point, to_point));
    float point = abs(dot(n, normalize(to_point))) * u_point_intensity * falloff;
    float light = min(u_ambient + key + point, 1.0);
    frag_color = vec4(v_color * light, 1.0);
}
"#;
