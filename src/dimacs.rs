use std::fs;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, line_ending, not_line_ending, space0, space1};
use nom::combinator::{map_res, opt};
use nom::multi::many0;
use nom::sequence::{preceded, separated_pair, terminated, tuple};

use crate::color::Solution;
use crate::error::ColoringError;
use crate::graph::Graph;


/// reads an instance from a DIMACS file
pub fn read_from_file(filename:&str) -> Result<Graph, ColoringError> {
    let content = fs::read_to_string(filename)?;
    read_from_str(&content)
}

/** reads an instance in the DIMACS format:
    - lines starting with 'c' are comments
    - header: "p edge n m" (or "p col n m")
    - edges: "e a b" (WARNING: indices start at 1 in the DIMACS format)
*/
pub fn read_from_str(content:&str) -> Result<Graph, ColoringError> {
    let content = content.replace("\r", "");
    let (s, _) = skip_comments(content.as_str()).map_err(to_parse_error)?;
    let (mut s, (n, m)) = read_header(s).map_err(to_parse_error)?;
    let mut graph = Graph::new(n, false);
    let mut check_nb_edges = 0;
    loop {
        s = skip_comments(s).map_err(to_parse_error)?.0;
        if s.trim().is_empty() { break; }
        let (remaining, (a, b)) = read_edge(s).map_err(|_| {
            ColoringError::Parse(format!("invalid edge line: {}", s.lines().next().unwrap_or("")))
        })?;
        if a == 0 || b == 0 {
            return Err(ColoringError::Parse("vertices are numbered from 1".to_string()));
        }
        graph.set_adjacent(a-1, b-1, true)?;
        check_nb_edges += 1;
        s = remaining;
    }
    if check_nb_edges != m && 2*check_nb_edges != m {
        return Err(ColoringError::Parse(format!(
            "header announces {} edges, {} read", m, check_nb_edges
        )));
    }
    Ok(graph)
}

fn to_parse_error(e:nom::Err<nom::error::Error<&str>>) -> ColoringError {
    ColoringError::Parse(e.to_string())
}

/// skips a single comment (or an empty line)
fn skip_comment(s:&str) -> IResult<&str, &str> {
    alt((
        preceded(tag("c"), terminated(not_line_ending, opt(line_ending))),
        preceded(space0, line_ending),
    ))(s)
}

/// skips all comments
pub fn skip_comments(s:&str) -> IResult<&str, Vec<&str>> {
    many0(skip_comment)(s)
}

fn integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two numbers separated by spaces (and the end of the line)
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    terminated(
        separated_pair(integer, space1, integer),
        tuple((space0, opt(line_ending)))
    )(s)
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(
        tuple((tag("p"), space1, alt((tag("edge"), tag("col"))), space1)),
        read_two_integers
    )(s)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(tuple((tag("e"), space1)), read_two_integers)(s)
}

/** writes a string encoding the solution (use this to export the solution).
each line corresponds to a color. */
pub fn solution_to_string(solution:&[Vec<usize>]) -> String {
    let mut res = String::default();
    for e in solution {
        for v in e {
            res += format!("{} ", v).as_str();
        }
        res += "\n";
    }
    res
}

/** writes a solution into a file. each line corresponds to a color. */
pub fn write_solution(filename:&str, solution:&Solution) -> Result<(), ColoringError> {
    fs::write(filename, solution_to_string(solution))?;
    Ok(())
}
