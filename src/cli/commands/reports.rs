use clap::{Arg, Command};

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("reports")
                .about("List a student's uploaded report cards for one semester")
                .arg(
                    Arg::new("student")
                        .long("student")
                        .help("Student id")
                        .required(true),
                )
                .arg(
                    Arg::new("semester")
                        .long("semester")
                        .help("Semester id")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("upload")
                .about("Upload a report card PDF for one student course")
                .arg(
                    Arg::new("file")
                        .help("PDF file to upload")
                        .required(true),
                )
                .arg(
                    Arg::new("student-course")
                        .long("student-course")
                        .help("Student course id")
                        .required(true),
                )
                .arg(
                    Arg::new("semester")
                        .long("semester")
                        .help("Semester id")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("download")
                .about("Download a protected report file")
                .arg(
                    Arg::new("path")
                        .help("File path under the media root, example: /media/reports/card_12.pdf")
                        .required(true),
                )
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .help("Directory to save into")
                        .default_value("."),
                ),
        )
}
