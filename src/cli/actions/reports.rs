use crate::{
    cli::globals::{Console, GlobalArgs},
    features::reports::list_reports,
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub student: String,
    pub semester: String,
}

/// Lists the student's report cards for one semester, one per line.
/// # Errors
/// Returns an error if the session store cannot be read or the API call fails.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(&args.globals)?;
    let token = console.session.access_token()?;

    let cards = list_reports(&console.client, &args.student, &args.semester, token.as_ref()).await?;
    if cards.is_empty() {
        println!(
            "No report cards found for this student in semester: {}",
            args.semester
        );
        return Ok(());
    }

    for (index, card) in cards.iter().enumerate() {
        println!(
            "{}\t{}\t{}",
            index + 1,
            card.semester_label(),
            card.file_path().unwrap_or("No File")
        );
    }
    Ok(())
}
