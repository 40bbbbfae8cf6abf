use std::process::ExitCode;

use lumen_engine::core::SceneConfig;

fn main() -> ExitCode {
    lumen_demo::launch("lumen: triangle", SceneConfig::triangle())
}
