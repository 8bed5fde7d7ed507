use crate::error::RetimeError;
use crate::srt::Cue;

use std::time::Duration;

use anyhow::Context;
use nom::bytes::complete::{tag, take_while1, take_while_m_n};
use nom::character::complete::{digit1, line_ending, multispace0, multispace1, space0, space1};
use nom::combinator::{map_res, opt};
use nom::error::{convert_error, ErrorKind, VerboseError};
use nom::multi::many_till;
use nom::sequence::terminated;
use nom::{branch::alt, error_position, Err, IResult};

pub struct Parser;
impl Parser {
    pub fn new() -> Self {
        Self {}
    }

    pub fn parse(&mut self, input: &str) -> Result<Vec<Cue>, anyhow::Error> {
        match srt_track(input) {
            Ok((_, cues)) => Ok(cues),
            Err(Err::Error(err)) | Err(Err::Failure(err)) => {
                let conv = convert_error(input, err);
                Err(RetimeError::ParseError(conv)).context("Failed to parse SRT file")
            }
            Err(Err::Incomplete(_)) => {
                unreachable!("Incomplete data received by non-streaming parser.")
            }
        }
    }
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

/// Parses a full track. Cues are returned in file order; callers depend
/// on that order surviving into the output.
fn srt_track(input: &str) -> IResult<&str, Vec<Cue>, VerboseError<&str>> {
    let (input, _) = optional_bom(input)?;
    let (input, cues) = all_cues(input)?;
    let (input, _) = end_of_file(input)?;
    Ok((input, cues))
}

fn all_cues(input: &str) -> IResult<&str, Vec<Cue>, VerboseError<&str>> {
    let mut parsed = Vec::new();
    let mut input = input;
    loop {
        match cue(input) {
            Ok((rem_input, cue)) => {
                parsed.push(cue);
                input = rem_input;
                let (rem_input, _) = multispace0(input)?;
                input = rem_input;
            }
            Err(err) => {
                if input.is_empty() {
                    return Ok((input, parsed));
                } else {
                    return Err(err);
                }
            }
        }
    }
}

fn cue(input: &str) -> IResult<&str, Cue, VerboseError<&str>> {
    let (input, _) = multispace0(input)?;
    let (input, index) = terminated(cue_index, multispace1)(input)?;
    let (input, (start, end)) = terminated(cue_times, line_ending)(input)?;
    let (input, text) = cue_text(input)?;

    Ok((
        input,
        Cue {
            index,
            start,
            end,
            text,
        },
    ))
}

fn end_of_file(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        std::result::Result::Err(Err::Error(error_position!(input, ErrorKind::Eof)))
    }
}

fn cue_text(input: &str) -> IResult<&str, Vec<String>, VerboseError<&str>> {
    let line = terminated(
        take_while1(|c: char| c != '\n' && c != '\r'),
        alt((line_ending, end_of_file)),
    );

    let (input, (vec, _)) = many_till(line, alt((line_ending, end_of_file)))(input)?;

    Ok((input, vec.into_iter().map(String::from).collect()))
}

fn cue_times(input: &str) -> IResult<&str, (Duration, Duration), VerboseError<&str>> {
    let (input, start) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, end) = timestamp(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (start, end)))
}

fn timestamp(input: &str) -> IResult<&str, Duration, VerboseError<&str>> {
    const MILLIS_MIN: usize = 0;
    const MILLIS_MAX: usize = 3;
    let take_millis = || {
        map_res(
            take_while_m_n(MILLIS_MIN, MILLIS_MAX, |c: char| c.is_digit(10)),
            move |s: &str| {
                if s.len() < MILLIS_MAX {
                    // Sometimes, a milliseconds value like `,2` may be encountered.
                    // This is not valid SRT, but we must be able to handle it anyway.
                    // We choose to interpret this as `,200`. In other words, we right-pad
                    // every string until it reaches a length of 3 characters.
                    let millis = format!("{:0<3}", s);
                    millis.parse()
                } else {
                    s.parse()
                }
            },
        )
    };

    const HMS_MIN: usize = 0;
    const HMS_MAX: usize = 2;
    let take_hms = || {
        map_res(
            take_while_m_n(HMS_MIN, HMS_MAX, |c: char| c.is_digit(10)),
            |s: &str| {
                if s.len() < HMS_MAX {
                    // Unlike in the previous situation, here we left-pad the value instead,
                    // because it makes more sense to treat 1:13:45 as 01:13:45 than as 10:13:45.
                    let padded = format!("{:0>2}", s);
                    padded.parse()
                } else {
                    s.parse()
                }
            },
        )
    };

    let (input, hours): (_, u64) = take_hms()(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = take_hms()(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = take_hms()(input)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis): (_, u64) = take_millis()(input)?;

    Ok((
        input,
        Duration::from_millis(
            millis + seconds * 1000 + minutes * 60 * 1000 + hours * 60 * 60 * 1000,
        ),
    ))
}

fn cue_index(input: &str) -> IResult<&str, usize, VerboseError<&str>> {
    map_res(digit1, |s: &str| s.parse())(input)
}
