use crate::blackboard::Criterion;
use crate::blackboard::Stage;
use std::collections::BTreeMap;

/// Tolerant parsing of the labeled-section responses the agent prompts
/// request. A header is an ALL-CAPS label followed by a colon; a section
/// runs until the next header.

/// winner designation parsed from a match verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// body of a named section, if present and non-empty
pub fn section(text: &str, header: &str) -> Option<String> {
    let mut inside = false;
    let mut collected = Vec::new();
    for line in text.lines() {
        match header_of(line) {
            Some(h) if h == header => {
                inside = true;
                collected.push(line.split_once(':').expect("header has colon").1.trim());
            }
            Some(_) if inside => break,
            _ if inside => collected.push(line.trim()),
            _ => continue,
        }
    }
    Some(collected.join(" ").trim().to_string()).filter(|body| !body.is_empty())
}

/// split a multi-hypothesis response into per-hypothesis blocks at TITLE
pub fn blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        if header_of(line) == Some("TITLE".to_string()) {
            blocks.push(Vec::new());
        }
        if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }
    blocks.into_iter().map(|block| block.join("\n")).collect()
}

/// one scored criterion line, "NAME: <score> - <assessment>"
pub fn criterion(text: &str, name: &str) -> Option<Criterion> {
    let body = section(text, name)?;
    match body.split_once('-') {
        Some((score, assessment)) => Some(Criterion {
            score: score.trim().parse().ok()?,
            assessment: assessment.trim().to_string(),
        }),
        None => Some(Criterion {
            score: body.trim().parse().ok()?,
            assessment: String::new(),
        }),
    }
}

/// assemble a review stage from the criteria a prompt asked for
pub fn stage(text: &str, names: &[&str]) -> Stage {
    Stage {
        criteria: names
            .iter()
            .filter_map(|name| criterion(text, name).map(|c| (name.to_lowercase(), c)))
            .collect::<BTreeMap<_, _>>(),
        overall: section(text, "OVERALL").unwrap_or_default(),
        passed: passed(text),
    }
}

/// the PASSED verdict line; anything but an affirmative reads as failed
pub fn passed(text: &str) -> bool {
    section(text, "PASSED")
        .map(|verdict| verdict.to_lowercase().starts_with('y'))
        .unwrap_or(false)
}

/// the WINNER designation of a match verdict
pub fn winner(text: &str) -> Option<Side> {
    match section(text, "WINNER")?.to_uppercase().chars().next()? {
        'A' => Some(Side::A),
        'B' => Some(Side::B),
        _ => None,
    }
}

/// (title, description) pairs from a focus-area response
pub fn focus_areas(text: &str) -> Vec<(String, String)> {
    let mut areas = Vec::new();
    let mut title: Option<String> = None;
    for line in text.lines() {
        let body = line.split_once(':').map(|(_, b)| b.trim().to_string());
        match header_of(line).as_deref() {
            Some("FOCUS AREA") => {
                if let Some(pending) = title.replace(body.unwrap_or_default()) {
                    areas.push((pending, String::new()));
                }
            }
            Some("DESCRIPTION") => {
                if let Some(pending) = title.take() {
                    areas.push((pending, body.unwrap_or_default()));
                }
            }
            _ => continue,
        }
    }
    if let Some(pending) = title {
        areas.push((pending, String::new()));
    }
    areas.retain(|(title, _)| !title.is_empty());
    areas
}

fn header_of(line: &str) -> Option<String> {
    let (head, _) = line.split_once(':')?;
    let head = head.trim();
    let labelish = !head.is_empty()
        && head.len() <= 24
        && head.starts_with(|c: char| c.is_ascii_uppercase())
        && head
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ');
    match labelish {
        true => Some(head.to_string()),
        false => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "TITLE: A bold idea\n\
                            STATEMENT: X causes Y.\n\
                            continued across lines.\n\
                            RATIONALE: because Z.\n\
                            TESTABILITY: measure Y after X.";

    #[test]
    fn sections_end_at_next_header() {
        assert!(section(RESPONSE, "TITLE") == Some("A bold idea".to_string()));
        assert!(section(RESPONSE, "STATEMENT") == Some("X causes Y. continued across lines.".to_string()));
        assert!(section(RESPONSE, "MISSING").is_none());
    }

    #[test]
    fn prose_colons_are_not_headers() {
        let text = "STATEMENT: The ratio is 3:1 in controls.\nNote: lowercase is prose.";
        assert!(
            section(text, "STATEMENT")
                == Some("The ratio is 3:1 in controls. Note: lowercase is prose.".to_string())
        );
    }

    #[test]
    fn blocks_split_at_each_title() {
        let text = format!("{}\n\n{}", RESPONSE, RESPONSE);
        let blocks = blocks(&text);
        assert!(blocks.len() == 2);
        assert!(section(&blocks[1], "STATEMENT").is_some());
    }

    #[test]
    fn criterion_splits_score_and_assessment() {
        let text = "CORRECTNESS: 4 - logically sound";
        let c = criterion(text, "CORRECTNESS").unwrap();
        assert!(c.score == 4);
        assert!(c.assessment == "logically sound");
        assert!(criterion(text, "NOVELTY").is_none());
        assert!(criterion("CORRECTNESS: strong", "CORRECTNESS").is_none());
    }

    #[test]
    fn stage_collects_requested_criteria() {
        let text = "CORRECTNESS: 4 - fine\nNOVELTY: 5 - fresh\nOVERALL: good\nPASSED: yes";
        let stage = stage(text, &["CORRECTNESS", "NOVELTY", "SAFETY"]);
        assert!(stage.criteria.len() == 2);
        assert!(stage.passed);
        assert!(stage.overall == "good");
    }

    #[test]
    fn missing_verdict_reads_as_failed() {
        assert!(!passed("OVERALL: looks fine"));
        assert!(passed("PASSED: Yes"));
        assert!(!passed("PASSED: no"));
    }

    #[test]
    fn winner_parses_either_side() {
        assert!(winner("WINNER: A\nREASONING: stronger") == Some(Side::A));
        assert!(winner("WINNER: B") == Some(Side::B));
        assert!(winner("WINNER: C").is_none());
        assert!(winner("REASONING: no verdict").is_none());
    }

    #[test]
    fn focus_areas_pair_titles_with_descriptions() {
        let text = "FOCUS AREA: alpha\nDESCRIPTION: first\nFOCUS AREA: beta\nDESCRIPTION: second";
        let areas = focus_areas(text);
        assert!(areas.len() == 2);
        assert!(areas[0] == ("alpha".to_string(), "first".to_string()));
        assert!(areas[1] == ("beta".to_string(), "second".to_string()));
    }

    #[test]
    fn focus_area_without_description_still_counts() {
        let areas = focus_areas("FOCUS AREA: lonely");
        assert!(areas == vec![("lonely".to_string(), String::new())]);
    }
}
