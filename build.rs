use std::fs::read_to_string;

const SHADER_DIR: &str = "shaders";

// The demo compiles its shaders at runtime and survives a broken one, so a
// failure here is only reported.
fn check_shader(filename: &str, ty: glsl_to_spirv::ShaderType) {
    let path = format!("{}/{}", SHADER_DIR, filename);
    println!("cargo:rerun-if-changed={}", path);

    let code = match read_to_string(&path) {
        Ok(code) => code,
        Err(err) => {
            println!("cargo:warning=cannot read {}: {}", path, err);
            return;
        }
    };
    if let Err(err) = glsl_to_spirv::compile(&code, ty) {
        for line in err.lines() {
            println!("cargo:warning={}: {}", path, line);
        }
    }
}

fn main() {
    check_shader("vertexShader.glsl", glsl_to_spirv::ShaderType::Vertex);
    check_shader("fragmentShader.glsl", glsl_to_spirv::ShaderType::Fragment);
}
