use std::io::{BufRead, Write};

use crate::models::FilterUpdate;
use crate::report::build_dashboard;
use crate::state::DashboardController;

const HELP: &str = "commands: <class|type|status|window|search> <value>, reset, help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Update(FilterUpdate),
    Reset,
    Help,
    Quit,
    Skip,
}

/// Parses one input line. The value is everything after the first space, so
/// `search` alone clears the search and `class Grade 10` keeps its space.
pub fn parse_command(line: &str) -> Result<Command, crate::error::ParseError> {
    let line = line.trim();
    match line {
        "" => return Ok(Command::Skip),
        "quit" | "exit" => return Ok(Command::Quit),
        "reset" => return Ok(Command::Reset),
        "help" | "?" => return Ok(Command::Help),
        _ => {}
    }

    let (key, value) = line.split_once(' ').unwrap_or((line, ""));
    FilterUpdate::parse(key, value.trim()).map(Command::Update)
}

/// Renders the dashboard, then applies one event per input line and renders
/// again. Bad input is reported and leaves the filters untouched.
pub fn run<R, W>(
    controller: &mut DashboardController<'_>,
    input: R,
    mut output: W,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", build_dashboard(controller))?;
    writeln!(output, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Command::Skip) => continue,
            Ok(Command::Quit) => break,
            Ok(Command::Help) => {
                writeln!(output, "{HELP}")?;
                continue;
            }
            Ok(Command::Reset) => {
                controller.reset();
            }
            Ok(Command::Update(update)) => {
                controller.set_filter(update);
            }
            Err(err) => {
                tracing::warn!(input = %line, error = %err, "rejected filter event");
                writeln!(output, "error: {err}")?;
                continue;
            }
        }
        writeln!(output, "{}", build_dashboard(controller))?;
    }

    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::models::{ActivityStatus, FilterState, Selection, TimeWindow};
    use crate::store::ActivityStore;

    #[test]
    fn parses_filter_events() {
        let grade_10 = FilterUpdate::ClassName(Selection::Only("Grade 10".to_string()));
        assert_eq!(
            parse_command("class Grade 10").unwrap(),
            Command::Update(grade_10)
        );
        let in_progress = FilterUpdate::Status(Selection::Only(ActivityStatus::InProgress));
        assert_eq!(
            parse_command("status In Progress").unwrap(),
            Command::Update(in_progress)
        );
        assert_eq!(
            parse_command("search").unwrap(),
            Command::Update(FilterUpdate::Search(String::new()))
        );
        assert_eq!(parse_command("  ").unwrap(), Command::Skip);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(
            parse_command("room 212"),
            Err(ParseError::UnknownFilterKey("room".to_string()))
        );
    }

    #[test]
    fn session_applies_events_in_order() {
        let store = ActivityStore::embedded().unwrap();
        let mut controller = DashboardController::new(&store);
        let input = "type Sports\nwindow 90d\nsearch basketball\nquit\nstatus Completed\n";
        let mut output = Vec::new();

        run(&mut controller, input.as_bytes(), &mut output).unwrap();

        let expected = FilterState {
            category: Selection::Only("Sports".parse().unwrap()),
            search: "basketball".to_string(),
            window: TimeWindow::All,
            ..FilterState::default()
        };
        assert_eq!(controller.filters(), &expected);
        assert_eq!(controller.view().activities.len(), 1);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error: unknown time window: 90d"));
        assert!(text.contains("Varsity Basketball Practice"));
    }

    #[test]
    fn bare_selection_key_is_rejected() {
        assert_eq!(
            parse_command("class"),
            Err(ParseError::MissingValue("class".to_string()))
        );

        let store = ActivityStore::embedded().unwrap();
        let mut controller = DashboardController::new(&store);
        let mut output = Vec::new();
        run(&mut controller, "type\nclass  \n".as_bytes(), &mut output).unwrap();

        assert_eq!(controller.filters(), &FilterState::default());
        assert_eq!(controller.view().activities.len(), 12);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error: missing value for filter class"));
    }

    #[test]
    fn reset_clears_a_session() {
        let store = ActivityStore::embedded().unwrap();
        let mut controller = DashboardController::new(&store);
        let input = "class Faculty\nreset\n";
        run(&mut controller, input.as_bytes(), Vec::<u8>::new()).unwrap();
        assert_eq!(controller.filters(), &FilterState::default());
        assert_eq!(controller.view().activities.len(), 12);
    }
}
