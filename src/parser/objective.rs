use crate::models::{Cell, CostCategory, ErrorCode, Objective, Violation};
use crate::report::ErrorSession;
use std::collections::BTreeSet;
use std::path::Path;

const USES_TRIGGER: &str = "This tutorial uses";
const STEPS_TRIGGER: &str = "The steps performed";
const LEAD_INS: [&str; 2] = ["In this tutorial, you learn", "In this notebook, you learn"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Description,
    Uses,
    Steps,
}

/// Split an Objective cell into description, services used and steps.
///
/// The heading line is skipped. Missing regions are reported to `session`
/// and come back empty.
pub fn parse_objective(path: &Path, cell: &Cell, session: &mut ErrorSession) -> Objective {
    let lines = cell.source.get(1..).unwrap_or(&[]);
    let mut region = Region::Description;
    let mut description_done = false;
    let mut description = String::new();
    let mut uses = String::new();
    let mut steps = String::new();

    for line in lines {
        if line.starts_with(USES_TRIGGER) {
            region = Region::Uses;
            continue;
        }
        if line.starts_with(STEPS_TRIGGER) {
            region = Region::Steps;
            continue;
        }

        match region {
            Region::Description => {
                if description_done {
                    continue;
                }
                if line.trim().is_empty() {
                    // leading blank lines do not end the description
                    description_done = !description.is_empty();
                    continue;
                }
                description.push_str(line);
            }
            Region::Uses => push_list_line(&mut uses, line),
            Region::Steps => push_list_line(&mut steps, line),
        }
    }

    if description.is_empty() {
        session.report(Violation::new(
            path,
            ErrorCode::MissingDescription,
            "Objective section missing desc",
        ));
    } else {
        description = first_sentence(&description);
    }

    let mut costs = BTreeSet::new();
    if uses.trim().is_empty() {
        session.report(Violation::new(
            path,
            ErrorCode::MissingUses,
            "Objective section missing uses services list",
        ));
    } else {
        costs = infer_costs(&uses);
    }

    if steps.trim().is_empty() {
        session.report(Violation::new(
            path,
            ErrorCode::MissingSteps,
            "Objective section missing steps list",
        ));
    }

    Objective {
        description,
        uses,
        steps,
        costs,
    }
}

/// Keep list items; blank lines are kept as line breaks
fn push_list_line(region: &mut String, line: &str) {
    let trimmed = line.trim();
    match trimmed.chars().next() {
        None => region.push('\n'),
        Some(c) if c == '-' || c == '*' || c.is_ascii_digit() => region.push_str(line),
        Some(_) => {}
    }
}

/// First sentence of a description, with the boilerplate lead-in removed
fn first_sentence(description: &str) -> String {
    let description = description.trim_start();
    let mut sentence = match description.split_once('.') {
        Some((first, _)) => format!("{}.\n", first),
        None => description.to_string(),
    };

    if let Some(rest) = LEAD_INS.iter().find_map(|lead| sentence.strip_prefix(lead)) {
        let rest = rest.trim_start();
        let mut chars = rest.chars();
        sentence = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }

    sentence
}

/// Billable services named in a uses list
pub fn infer_costs(uses: &str) -> BTreeSet<CostCategory> {
    CostCategory::ALL
        .into_iter()
        .filter(|category| uses.contains(category.keyword()))
        .collect()
}
