use nom::{
    IResult,
    bytes::complete::{tag, take_until},
    character::complete::{char, digit1, space0, space1},
    combinator::map,
    sequence::{preceded, separated_pair, terminated, tuple},
};

/// Counts as printed, not yet converted to numbers.
#[derive(Debug, PartialEq)]
pub(super) struct Summary<'a> {
    pub total: &'a str,
    pub recent: &'a str,
}

fn opening<'a>(side: &str, input: &'a str) -> IResult<&'a str, &'a str> {
    preceded(
        tuple((
            space0,
            tag("Opening"),
            space1,
            tag(side),
            space1,
            tag("box"),
            space1,
        )),
        terminated(take_until("..."), tag("...")),
    )(input)
}

fn summary<'a>(side: &str, input: &'a str) -> IResult<&'a str, Summary<'a>> {
    preceded(
        tuple((space0, tag(side), char(':'), space1)),
        map(
            separated_pair(
                terminated(digit1, tuple((space1, tag("messages,")))),
                space1,
                terminated(digit1, tuple((space1, tag("recent")))),
            ),
            |(total, recent)| Summary { total, recent },
        ),
    )(input)
}

/// Mailbox name of an `Opening <side> box <name>...` line.
pub(super) fn opening_line<'a>(side: &str, line: &'a str) -> Option<&'a str> {
    opening(side, line)
        .ok()
        .map(|(_, mailbox)| mailbox)
        .filter(|mailbox| !mailbox.is_empty())
}

/// Counts of a `<side>: <total> messages, <recent> recent` line.
pub(super) fn summary_line<'a>(side: &str, line: &'a str) -> Option<Summary<'a>> {
    summary(side, line).ok().map(|(_, summary)| summary)
}
