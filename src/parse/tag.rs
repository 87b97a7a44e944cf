// SPDX-License-Identifier: GPL-2.0-only

//! Tag listings from `show-ref --tags -d` and `show --raw <tag>`.

use indexmap::IndexMap;

use crate::model::{GitObjectType, GitTag};

/// Parse dereferenced show-ref output into a name-keyed tag map.
///
/// Annotated tags produce two lines, the tag object itself and its `^{}`
/// dereference; the pair folds into one entry with distinct `id` and
/// `object_id`. Lightweight tags produce a single line and keep
/// `id == object_id`.
///
/// ```text
/// 21c2c3543b0ae80173224b8deaa0a39bbfd4bd39 refs/tags/v1.0
/// 8f2e3defadd2b7a38e04a0ad00a01c40a44ac802 refs/tags/v1.0^{}
/// 16e930c287a1b1b24bb2c9f4e6b49c1a8e15dc3f refs/tags/v1.1-light
/// ```
pub(crate) fn parse_show_ref(text: &str) -> IndexMap<String, GitTag> {
    let mut tags: IndexMap<String, GitTag> = IndexMap::new();
    for line in text.lines() {
        let mut split = line.splitn(2, ' ');
        let (Some(id), Some(refname)) = (split.next(), split.next()) else {
            continue;
        };
        let Some(name) = refname.strip_prefix("refs/tags/") else {
            continue;
        };
        if let Some(name) = name.strip_suffix("^{}") {
            if let Some(tag) = tags.get_mut(name) {
                tag.object_id = id.to_string();
                tag.object_type = GitObjectType::Commit;
                tag.lightweight = false;
            }
        } else {
            tags.insert(
                name.to_string(),
                GitTag {
                    name: name.to_string(),
                    id: id.to_string(),
                    object_id: id.to_string(),
                    object_type: GitObjectType::Commit,
                    message: String::new(),
                    tagger: None,
                    lightweight: true,
                },
            );
        }
    }
    tags
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Before the annotation: `tag`/`Tagger:` headers.
    Header,
    /// Annotation message lines, up to the shown object.
    Message,
    /// Inside the tagged object's own output; only the id is interesting.
    Object,
}

/// Fill tag details from `show --raw <tag>` output.
///
/// For an annotated tag the output opens with a `tag` header and the
/// annotation, followed by the tagged commit; for a lightweight tag the
/// commit comes first and there is nothing to add beyond the object id.
pub(crate) fn parse_show(tag: &mut GitTag, text: &str) {
    let mut state = State::Header;
    let mut message: Vec<String> = Vec::new();
    for line in text.lines() {
        match state {
            State::Header => {
                if let Some(name) = line.strip_prefix("tag ") {
                    tag.name = name.trim().to_string();
                    tag.lightweight = false;
                } else if let Some(tagger) = line.strip_prefix("Tagger: ") {
                    tag.tagger = Some(tagger.trim().to_string());
                } else if let Some((object_type, id)) = object_header(line) {
                    tag.object_type = object_type;
                    tag.object_id = id.to_string();
                    state = State::Object;
                } else if line.is_empty() {
                    state = if tag.lightweight {
                        State::Header
                    } else {
                        State::Message
                    };
                }
            }
            State::Message => {
                if let Some((object_type, id)) = object_header(line) {
                    tag.object_type = object_type;
                    tag.object_id = id.to_string();
                    state = State::Object;
                } else {
                    message.push(line.to_string());
                }
            }
            State::Object => {}
        }
    }
    while message.last().is_some_and(|l| l.is_empty()) {
        message.pop();
    }
    while message.first().is_some_and(|l| l.is_empty()) {
        message.remove(0);
    }
    if !message.is_empty() {
        tag.message = message.join("\n");
    }
}

fn object_header(line: &str) -> Option<(GitObjectType, &str)> {
    let (kind, rest) = line.split_once(' ')?;
    let object_type = match GitObjectType::from_token(kind) {
        // A `tag <name>` header is handled by the caller's Header state.
        GitObjectType::Unknown | GitObjectType::Tag => return None,
        object_type => object_type,
    };
    let token = rest.split_whitespace().next().unwrap_or("");
    // Tagged object headers carry a full hex id.
    if token.len() == 40 && token.chars().all(|c| c.is_ascii_hexdigit()) {
        Some((object_type, token))
    } else {
        None
    }
}
