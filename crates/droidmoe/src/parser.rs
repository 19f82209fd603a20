use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::mods;
use crate::types::{Grade, Rank, Score, ScoreKind, UserProfile};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing '{start}' … '{end}' delimiter pair")]
    MissingDelimiter {
        start: &'static str,
        end: &'static str,
    },
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Failed to parse number: {0}")]
    NumberParse(String),
    #[error("Failed to parse date: {0}")]
    DateParse(String),
    #[error("Unknown mod: {0}")]
    UnknownMod(String),
    #[error("Unknown grade: {0}")]
    UnknownGrade(String),
}

pub(crate) const NOT_FOUND_MARKER: &str = "<h1>User not found.</h1>";

const PAYLOAD_START: &str = "<!--Avatar, Region, Rank-->";
const PAYLOAD_END: &str = r#"<footer class="footer">"#;
const TOP_PLAYS_MARKER: &str = "<!--Top Plays-->";
const RECENT_PLAYS_LABEL: &str = "Recent Plays</b>";

const AVATAR_BASE: &str = "https://osudroid.moe/user/avatar/";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Every extraction rule is a literal start/end delimiter pair compiled into a
// non-greedy capture. The delimiter text, not the document structure, is the
// compatibility surface with the live markup.
fn rule(start: &str, end: &str) -> Regex {
    Regex::new(&format!(
        "{}(.*?){}",
        regex::escape(start),
        regex::escape(end)
    ))
    .expect("invalid extraction rule")
}

static RE_LINK_TEXT: LazyLock<Regex> = LazyLock::new(|| rule("<a>", "</a>"));
static RE_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| rule(r##"15px; color: #EB2F96;">"##, "</a>"));
static RE_AVATAR: LazyLock<Regex> = LazyLock::new(|| rule(r#"src="./user/avatar/"#, r#"""#));
static RE_TECH_CELL: LazyLock<Regex> = LazyLock::new(|| rule("</td> <td>", "</td> </tr>"));

static RE_SCORE_BLOCK: LazyLock<Regex> = LazyLock::new(|| rule(r#"<a class="">"#, "</span>"));
static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| rule(r#"<strong class="">"#, "</strong>"));
static RE_GRADE: LazyLock<Regex> = LazyLock::new(|| rule("/assets/img/ranking-", r#".png""#));
static RE_SCORE_TOTAL: LazyLock<Regex> = LazyLock::new(|| rule("score: ", " / "));
static RE_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| rule(r#"style="margin-left: 50px;">"#, " /"));
static RE_DPP: LazyLock<Regex> = LazyLock::new(|| rule("pp:", "/"));
static RE_MODS: LazyLock<Regex> = LazyLock::new(|| rule("mod:", "/"));
static RE_ACCURACY: LazyLock<Regex> = LazyLock::new(|| rule("accuracy: ", "%"));
static RE_COMBO: LazyLock<Regex> = LazyLock::new(|| rule("combo: ", " x"));
static RE_MISSES: LazyLock<Regex> = LazyLock::new(|| rule("miss: ", "<"));
static RE_HASH: LazyLock<Regex> = LazyLock::new(|| rule(r#""hash":"#, "}"));

fn first_between<'a>(
    re: &Regex,
    haystack: &'a str,
    field: &'static str,
) -> Result<&'a str, ParseError> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(ParseError::MissingField(field))
}

fn all_between<'a>(re: &Regex, haystack: &'a str) -> Vec<&'a str> {
    re.captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

fn parse_num<T: FromStr>(raw: &str) -> Result<T, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::NumberParse(raw.to_string()))
}

fn parse_timestamp(raw: &str) -> Result<i64, ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .map(|t| t.and_utc().timestamp_millis())
        .map_err(|_| ParseError::DateParse(raw.to_string()))
}

// The page is pretty-printed; dropping newlines and collapsing space runs
// leaves a single space at every former line break, which is what the
// delimiter pairs above are written against.
fn normalize_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_space = false;
    for c in raw.chars() {
        match c {
            '\n' | '\r' => {}
            ' ' => {
                if !prev_space {
                    out.push(' ');
                }
                prev_space = true;
            }
            _ => {
                out.push(c);
                prev_space = false;
            }
        }
    }
    out
}

/// Reduces a raw profile page body to the usable payload: `None` for the
/// "user not found" page, otherwise the normalized substring between the
/// avatar comment and the page footer.
pub fn payload(body: &str) -> Result<Option<String>, ParseError> {
    if body.contains(NOT_FOUND_MARKER) {
        return Ok(None);
    }
    let normalized = normalize_markup(body);
    let missing = || ParseError::MissingDelimiter {
        start: PAYLOAD_START,
        end: PAYLOAD_END,
    };
    let after = normalized
        .find(PAYLOAD_START)
        .map(|i| &normalized[i + PAYLOAD_START.len()..])
        .ok_or_else(missing)?;
    let payload = after
        .find(PAYLOAD_END)
        .map(|i| &after[..i])
        .ok_or_else(missing)?;
    Ok(Some(payload.to_string()))
}

pub fn user_region(payload: &str) -> &str {
    payload
        .find(TOP_PLAYS_MARKER)
        .map_or(payload, |i| &payload[..i])
}

// None means the profile has no play history rendered at all; the caller
// treats it as zero scores.
pub fn score_region(payload: &str, kind: ScoreKind) -> Option<&str> {
    let start = payload.find(TOP_PLAYS_MARKER)? + TOP_PLAYS_MARKER.len();
    let rest = &payload[start..];
    match kind {
        ScoreKind::Top => Some(rest.find(RECENT_PLAYS_LABEL).map_or(rest, |i| &rest[..i])),
        ScoreKind::Recent => rest
            .find(RECENT_PLAYS_LABEL)
            .map(|i| &rest[i + RECENT_PLAYS_LABEL.len()..]),
    }
}

fn parse_rank(token: &str) -> Result<u32, ParseError> {
    parse_num(token.strip_prefix('#').unwrap_or(token))
}

pub fn extract_user(region: &str, uid: u32) -> Result<UserProfile, ParseError> {
    // Bare <a> link texts in document order: country first, then the score
    // and dpp rank positions. Unranked profiles simply render fewer tokens.
    let link_texts = all_between(&RE_LINK_TEXT, region);
    let country = link_texts
        .first()
        .ok_or(ParseError::MissingField("country"))?
        .to_string();
    let rank = Rank {
        score: link_texts.get(1).map(|t| parse_rank(t)).transpose()?,
        dpp: link_texts.get(2).map(|t| parse_rank(t)).transpose()?,
    };

    let username = first_between(&RE_USERNAME, region, "username")?.to_string();
    let avatar = first_between(&RE_AVATAR, region, "avatar path")?;

    // Second table cell of each statistics row, positionally mapped.
    let cells = all_between(&RE_TECH_CELL, region);
    if cells.len() < 4 {
        return Err(ParseError::MissingField("profile statistics"));
    }
    let ranked_score: u64 = parse_num(&cells[0].replace(',', ""))?;
    let dpp: f64 = parse_num(&cells[1].replace(',', "").replace("pp", ""))?;
    let accuracy: f64 = parse_num(&cells[2].replace('%', ""))?;
    let playcount: u32 = parse_num(cells[3])?;

    Ok(UserProfile {
        id: uid,
        username,
        avatar_url: format!("{}{}", AVATAR_BASE, avatar),
        country,
        rank,
        ranked_score,
        dpp,
        accuracy,
        playcount,
    })
}

pub fn extract_scores(
    region: &str,
    user: &UserProfile,
    limit: Option<u32>,
) -> Result<Vec<Score>, ParseError> {
    let mut blocks = all_between(&RE_SCORE_BLOCK, region);
    if let Some(limit) = limit
        && limit > 0
        && blocks.len() > limit as usize
    {
        blocks.truncate(limit as usize);
    }
    blocks
        .iter()
        .map(|block| extract_score(block, user))
        .collect()
}

fn extract_score(block: &str, user: &UserProfile) -> Result<Score, ParseError> {
    let title = first_between(&RE_TITLE, block, "title")?.to_string();

    let grade_raw = first_between(&RE_GRADE, block, "grade")?;
    let grade: Grade = grade_raw
        .parse()
        .map_err(|_| ParseError::UnknownGrade(grade_raw.to_string()))?;

    let score: u64 = parse_num(&first_between(&RE_SCORE_TOTAL, block, "score")?.replace(',', ""))?;
    let timestamp = parse_timestamp(first_between(&RE_TIMESTAMP, block, "timestamp")?)?;
    let dpp: f64 = parse_num(first_between(&RE_DPP, block, "dpp")?)?;

    let mods_raw = first_between(&RE_MODS, block, "mods")?;
    let mods = mods::translate(mods_raw.replace([' ', 'x'], "").split(','))?;

    let accuracy: f64 = parse_num(first_between(&RE_ACCURACY, block, "accuracy")?)?;
    let combo: u32 = parse_num(first_between(&RE_COMBO, block, "combo")?)?;
    let misses: u32 = parse_num(first_between(&RE_MISSES, block, "misses")?)?;
    let hash = first_between(&RE_HASH, block, "hash")?.to_string();

    Ok(Score {
        title,
        grade,
        score,
        timestamp,
        dpp,
        accuracy,
        mods,
        combo,
        misses,
        hash,
        user: user.clone(),
    })
}
