use markgrid::{score_answers, AnswerKey, Scanner, SheetLayout};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <sheet.jpg> [layout.json] [key.json]", args[0]);
        std::process::exit(2);
    }

    let layout = match args.get(2) {
        Some(path) => SheetLayout::from_json_file(Path::new(path))?,
        None => SheetLayout::default(),
    };

    let scanner = Scanner::new(layout);
    let bytes = std::fs::read(&args[1])?;
    let result = scanner.scan_bytes(&bytes)?;

    println!(
        "Answered {} of {} questions.",
        result.n_answered(),
        result.answers.len()
    );
    for answer in &result.answers {
        println!(
            "  {:>3}. {}",
            answer.question_number,
            answer.selected.as_deref().unwrap_or("-")
        );
    }

    if let Some(key_path) = args.get(3) {
        let key = AnswerKey::from_json_file(Path::new(key_path))?;
        match score_answers(&result.answers, &key) {
            Some(summary) => println!(
                "Score: {} correct, {} wrong, {} empty",
                summary.correct, summary.wrong, summary.empty
            ),
            None => println!("Empty answer key; manual grading required."),
        }
    }
    Ok(())
}
