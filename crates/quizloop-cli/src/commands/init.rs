//! The `quizloop init` command.

use std::path::Path;

use anyhow::{Context, Result};

fn create(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content).with_context(|| format!("failed to write {path}"))?;
        println!("Created {path}");
    }
    Ok(())
}

pub fn execute() -> Result<()> {
    create("quizloop.toml", SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quizzes")?;
    create("quizzes/sample.csv", SAMPLE_QUIZ)?;
    create("quizzes/quizzes.json", SAMPLE_MANIFEST)?;

    println!("\nNext steps:");
    println!("  1. Run: quizloop validate --file quizzes/sample.csv");
    println!("  2. Run: quizloop list");
    println!("  3. Run: quizloop play --quiz sample.csv");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizloop configuration

state_dir = "./.quizloop"
request_timeout_secs = 30

[catalog]
type = "local"
dir = "./quizzes"

# Or serve quizzes from a web folder:
# [catalog]
# type = "http"
# base_url = "https://${QUIZ_HOST}/Quizzes"
"#;

const SAMPLE_QUIZ: &str = r#"Which keyword declares an immutable binding in Rust?,let,mut,var,const,let,Bindings are immutable unless marked mut
What does cargo build --release enable?,Optimizations,Debug assertions,Incremental builds only,Optimizations
Which type owns a growable UTF-8 string?,&str,String,char,String,&str is a borrowed slice
"Which trait gives a type a {:?} representation?",Display,Debug,Clone,Debug
"#;

const SAMPLE_MANIFEST: &str = r#"[
  { "file": "sample.csv", "title": "Rust warm-up" }
]
"#;
