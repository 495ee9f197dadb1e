use engine_bridge::engine::ReferenceEngine;
use engine_bridge::io::ConfigurablePrintTarget;
use engine_bridge::session::*;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default())?;
    session.print_to_stdout();

    print!("{}", session.eval_to_string("A = [1 2; 3 4]"));
    print!("{}", session.eval_to_string("size(A)"));

    let dir = std::env::temp_dir().join("engine_bridge_demo");
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("demo_script.m"),
        "% scale A\nB = A * 2;\ndisp(B)\n",
    )?;
    session.run_script_in_path(&dir, "demo_script.m")?;

    // rejected before reaching the engine
    print!("{}", session.run_script_to_string("demo_script.py"));

    fs::remove_dir_all(&dir)?;
    Ok(())
}
