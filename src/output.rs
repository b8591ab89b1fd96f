//! Terminal rendering for ranked clubs and facet options

use crate::catalog::facets::FacetOptions;
use crate::index::types::Club;
use crate::query::filter::FilterSelection;
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Print ranked clubs, one per line, most relevant first
pub fn print_results<W: WriteColor>(out: &mut W, results: &[Club], limit: usize) -> io::Result<()> {
    if results.is_empty() {
        writeln!(out, "No results found.")?;
        return Ok(());
    }

    let shown = results.len().min(limit);
    for (rank, club) in results.iter().take(limit).enumerate() {
        print_club_line(out, rank + 1, club)?;
    }

    if results.len() > shown {
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(out, "... and {} more", results.len() - shown)?;
        out.reset()?;
    }

    Ok(())
}

fn print_club_line<W: WriteColor>(out: &mut W, rank: usize, club: &Club) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "{:>3}.", rank)?;
    out.reset()?;
    write!(out, " ")?;

    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "{}", club.name)?;
    out.reset()?;

    if !club.aliases.is_empty() {
        write!(out, " (aka {})", club.aliases.join(", "))?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    write!(out, "  {} followers", club.followers)?;
    out.reset()?;

    if !club.schools.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "  [{}]", club.schools.join(", "))?;
        out.reset()?;
    }

    let tags: Vec<&str> = club
        .categories
        .iter()
        .chain(club.affiliations.iter())
        .map(String::as_str)
        .collect();
    if !tags.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "  {}", tags.join(", "))?;
        out.reset()?;
    }

    writeln!(out)?;
    Ok(())
}

/// Facet values split into what is selected and what can still be added
#[derive(Debug, Serialize)]
pub struct FacetReport<'a> {
    pub selected_schools: Vec<&'a str>,
    pub schools: Vec<&'a str>,
    pub selected_categories: Vec<&'a str>,
    pub categories: Vec<&'a str>,
}

impl<'a> FacetReport<'a> {
    pub fn new(facets: &'a FacetOptions, selection: &'a FilterSelection) -> Self {
        Self {
            selected_schools: selection.schools.iter().map(String::as_str).collect(),
            schools: facets.available_schools(selection),
            selected_categories: selection.categories.iter().map(String::as_str).collect(),
            categories: facets.available_categories(selection),
        }
    }
}

/// Print selected facet values marked with `*`, then the ones still available
pub fn print_facets<W: WriteColor>(out: &mut W, report: &FacetReport<'_>) -> io::Result<()> {
    print_facet_group(out, "Schools", &report.selected_schools, &report.schools)?;
    writeln!(out)?;
    print_facet_group(out, "Categories", &report.selected_categories, &report.categories)?;
    Ok(())
}

fn print_facet_group<W: WriteColor>(
    out: &mut W,
    label: &str,
    selected: &[&str],
    available: &[&str],
) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "{}:", label)?;
    out.reset()?;

    for value in selected {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "  * {}", value)?;
        out.reset()?;
    }

    if available.is_empty() {
        writeln!(out, "  No more {} available", label.to_lowercase())?;
        return Ok(());
    }
    for value in available {
        writeln!(out, "    {}", value)?;
    }
    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    fn render(results: &[Club], limit: usize) -> String {
        let mut buf = Buffer::no_color();
        print_results(&mut buf, results, limit).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn test_print_results() {
        let clubs = vec![
            Club::new("2", "Computer Club")
                .with_followers(50)
                .with_schools(["COLLEGE"])
                .with_categories(["Technology"]),
            Club::new("1", "Chess Club").with_aliases(["CC"]).with_followers(10),
        ];

        let text = render(&clubs, 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  1. Computer Club  50 followers  [COLLEGE]  Technology");
        assert_eq!(lines[1], "  2. Chess Club (aka CC)  10 followers");
    }

    #[test]
    fn test_print_results_limit() {
        let clubs: Vec<Club> = (0..5).map(|i| Club::new(i.to_string(), format!("Club {i}"))).collect();
        let text = render(&clubs, 2);
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("... and 3 more\n"));
    }

    #[test]
    fn test_print_no_results() {
        assert_eq!(render(&[], 10), "No results found.\n");
    }

    #[test]
    fn test_print_facets_marks_selected() {
        let facets = FacetOptions {
            schools: vec!["COLLEGE".to_string(), "LAW".to_string()],
            categories: Vec::new(),
        };
        let selection = FilterSelection::with_schools(["LAW"]);

        let mut buf = Buffer::no_color();
        print_facets(&mut buf, &FacetReport::new(&facets, &selection)).unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();

        assert_eq!(
            text,
            "Schools:\n  * LAW\n    COLLEGE\n\nCategories:\n  No more categories available\n"
        );
    }

    #[test]
    fn test_facet_report_lists_available_only() {
        let facets = FacetOptions {
            schools: vec!["BUSINESS".to_string(), "COLLEGE".to_string()],
            categories: vec!["Games".to_string(), "Sports".to_string()],
        };
        let mut selection = FilterSelection::with_schools(["COLLEGE"]);
        selection.toggle_category("Sports");

        let report = FacetReport::new(&facets, &selection);
        assert_eq!(report.selected_schools, vec!["COLLEGE"]);
        assert_eq!(report.schools, vec!["BUSINESS"]);
        assert_eq!(report.selected_categories, vec!["Sports"]);
        assert_eq!(report.categories, vec!["Games"]);
    }

    #[test]
    fn test_print_json() {
        let clubs = vec![Club::new("1", "Chess Club")];
        let mut out = Vec::new();
        print_json(&mut out, &clubs).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["name"], "Chess Club");
    }
}
