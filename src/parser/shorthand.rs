use super::ast::Shorthand;
use super::lexer::{identifier, ws};
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};

/// Parse a field shorthand
/// Format: field | field:T | agg(field):T | agg():T
pub fn parse_shorthand(input: &str) -> IResult<&str, Shorthand> {
    let (input, (aggregate, field)) = alt((
        aggregated_field,
        map(ws(identifier), |f| (None, Some(f))),
    ))(input)?;

    // Parse optional :type
    let (input, type_code) = opt(preceded(ws(char(':')), ws(identifier)))(input)?;

    Ok((
        input,
        Shorthand {
            aggregate,
            field,
            type_code,
        },
    ))
}

/// agg(field) or agg()
fn aggregated_field(input: &str) -> IResult<&str, (Option<String>, Option<String>)> {
    let (input, aggregate) = ws(identifier)(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, field) = opt(ws(identifier))(input)?;
    let (input, _) = ws(char(')'))(input)?;
    Ok((input, (Some(aggregate), field)))
}
