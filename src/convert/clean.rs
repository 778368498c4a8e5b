//! Tidy up imported campground records

use crate::models::Campground;

/// Split every `http…` run (up to the next newline) out of `note`.
///
/// Returns the remaining note text and the extracted links in order.
#[must_use]
pub fn extract_links(note: &str) -> (String, Vec<String>) {
    let mut remaining = note.to_string();
    let mut links = Vec::new();

    while let Some(start) = remaining.find("http") {
        match remaining[start..].find('\n') {
            Some(offset) => {
                let end = start + offset;
                links.push(remaining[start..end].to_string());
                remaining.replace_range(start..=end, "");
            }
            None => {
                links.push(remaining[start..].to_string());
                remaining.truncate(start);
            }
        }
    }

    (remaining, links)
}

/// Clean one record in place: drop the import index, move links from the note
/// to `website`, strip one trailing newline and drop an empty note.
pub fn clean_campground(campground: &mut Campground) {
    campground.index = None;

    let Some(note) = campground.note.take() else {
        return;
    };

    let (mut note, links) = extract_links(&note);
    if !links.is_empty() {
        campground.website = Some(links.join("\n"));
    }
    if note.ends_with('\n') {
        note.pop();
    }
    if !note.is_empty() {
        campground.note = Some(note);
    }
}

pub fn clean_campgrounds(campgrounds: &mut [Campground]) {
    campgrounds.iter_mut().for_each(clean_campground);
}
