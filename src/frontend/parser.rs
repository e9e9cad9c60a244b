use std::fmt;
use std::iter;
use std::rc::Rc;

/// Lazy sequence of `(result, remainder)` pairs produced by one parser run.
///
/// An empty sequence is a failure; more than one element is an ambiguous parse.
pub type Results<'a, T, R> = Box<dyn Iterator<Item = (R, &'a [T])> + 'a>;

type ParseFn<'a, T, R> = Rc<dyn Fn(&'a [T]) -> Results<'a, T, R> + 'a>;

/// Generic wrapper of a backtracking parse function over a slice of `T`.
///
/// Parsers are immutable values: cloning one is cheap and running it never
/// changes it, so the same parser can be reused on any number of inputs.
pub struct Parser<'a, T, R> {
    parse: ParseFn<'a, T, R>,
}

impl<'a, T, R> Clone for Parser<'a, T, R> {
    fn clone(&self) -> Self {
        Parser {
            parse: Rc::clone(&self.parse),
        }
    }
}

impl<'a, T, R> fmt::Debug for Parser<'a, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").finish_non_exhaustive()
    }
}

impl<'a, T: 'a, R: 'a> Parser<'a, T, R> {
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&'a [T]) -> Results<'a, T, R> + 'a,
    {
        Parser {
            parse: Rc::new(parse),
        }
    }

    /// Every way this parser can consume a prefix of `input`.
    pub fn parse(&self, input: &'a [T]) -> Results<'a, T, R> {
        (self.parse)(input)
    }

    /// Results that consume the whole input.
    pub fn parse_complete(&self, input: &'a [T]) -> impl Iterator<Item = R> + 'a {
        self.parse(input)
            .filter(|(_, rest)| rest.is_empty())
            .map(|(result, _)| result)
    }

    /// First complete parse, if any.
    pub fn first(&self, input: &'a [T]) -> Option<R> {
        self.parse_complete(input).next()
    }

    pub fn map<U: 'a, F>(self, f: F) -> Parser<'a, T, U>
    where
        F: Fn(R) -> U + 'a,
    {
        let f = Rc::new(f);
        Parser::new(move |input| {
            let f = Rc::clone(&f);
            Box::new(self.parse(input).map(move |(result, rest)| (f(result), rest)))
        })
    }

    /// Replaces the result with `x` whenever this parser matches.
    pub fn to<U: Clone + 'a>(self, x: U) -> Parser<'a, T, U> {
        self.map(move |_| x.clone())
    }
}

pub(crate) fn one<'a, T: 'a, R: 'a>(result: R, rest: &'a [T]) -> Results<'a, T, R> {
    Box::new(iter::once((result, rest)))
}

pub(crate) fn none<'a, T: 'a, R: 'a>() -> Results<'a, T, R> {
    Box::new(iter::empty())
}

/// Succeeds once with `x`, consuming nothing.
pub fn pure<'a, T: 'a, R: Clone + 'a>(x: R) -> Parser<'a, T, R> {
    Parser::new(move |input| one(x.clone(), input))
}

/// Never succeeds. Identity of alternation.
pub fn fail<'a, T: 'a, R: 'a>() -> Parser<'a, T, R> {
    Parser::new(|_| none())
}

/// Succeeds with `()` on empty input only.
pub fn eof<'a, T: 'a>() -> Parser<'a, T, ()> {
    Parser::new(|input: &'a [T]| {
        if input.is_empty() {
            one((), input)
        } else {
            none()
        }
    })
}

/// Consumes the first item if `condition` holds for it.
pub fn satisfy<'a, T, F>(condition: F) -> Parser<'a, T, T>
where
    T: Clone + 'a,
    F: Fn(&T) -> bool + 'a,
{
    Parser::new(move |input: &'a [T]| match input.split_first() {
        Some((head, tail)) if condition(head) => one(head.clone(), tail),
        _ => none(),
    })
}

/// Consumes the first item if it equals `t`.
pub fn token<'a, T>(t: T) -> Parser<'a, T, T>
where
    T: Clone + PartialEq + 'a,
{
    satisfy(move |head| *head == t)
}

/// Defers building the parser until it runs, which is what makes
/// self-referential grammars constructible.
pub fn lazy<'a, T, R, F>(f: F) -> Parser<'a, T, R>
where
    T: 'a,
    R: 'a,
    F: Fn() -> Parser<'a, T, R> + 'a,
{
    Parser::new(move |input| f().parse(input))
}

/// Turns a two-argument function into one taking its arguments one at a time,
/// for use with `pure(curry2(f)).apply(p).apply(q)`.
pub fn curry2<'a, A, B, C, F>(f: F) -> impl Fn(A) -> Box<dyn Fn(B) -> C + 'a> + Clone + 'a
where
    A: Clone + 'a,
    B: 'a,
    C: 'a,
    F: Fn(A, B) -> C + 'a,
{
    let f = Rc::new(f);
    move |a: A| {
        let f = Rc::clone(&f);
        Box::new(move |b: B| f(a.clone(), b)) as Box<dyn Fn(B) -> C + 'a>
    }
}

#[allow(clippy::type_complexity)]
pub fn curry3<'a, A, B, C, D, F>(
    f: F,
) -> impl Fn(A) -> Box<dyn Fn(B) -> Box<dyn Fn(C) -> D + 'a> + 'a> + Clone + 'a
where
    A: Clone + 'a,
    B: Clone + 'a,
    C: 'a,
    D: 'a,
    F: Fn(A, B, C) -> D + 'a,
{
    let f = Rc::new(f);
    move |a: A| {
        let f = Rc::clone(&f);
        Box::new(move |b: B| {
            let f = Rc::clone(&f);
            let a = a.clone();
            Box::new(move |c: C| f(a.clone(), b.clone(), c)) as Box<dyn Fn(C) -> D + 'a>
        }) as Box<dyn Fn(B) -> Box<dyn Fn(C) -> D + 'a> + 'a>
    }
}

#[cfg(test)]
const EMPTY: &[char] = &[];

#[cfg(test)]
fn results<'a, R: 'a>(parser: &Parser<'a, char, R>, input: &'a [char]) -> Vec<(R, &'a [char])> {
    parser.parse(input).collect()
}

#[test]
fn test_pure() {
    let input = ['a', 'b'];
    assert_eq!(results(&pure(7), &input), vec![(7, &input[..])]);
    assert_eq!(results(&pure(7), EMPTY), vec![(7, EMPTY)]);
}

#[test]
fn test_fail() {
    let input = ['a'];
    assert!(results(&fail::<char, ()>(), &input).is_empty());
}

#[test]
fn test_satisfy() {
    let input = ['1', 'a'];
    let digit = satisfy(|c: &char| c.is_ascii_digit());
    assert_eq!(results(&digit, &input), vec![('1', &input[1..])]);
    assert!(results(&digit, &input[1..]).is_empty());
    assert!(results(&digit, EMPTY).is_empty());
}

#[test]
fn test_token() {
    let input = ['x', 'y'];
    assert_eq!(results(&token('x'), &input), vec![('x', &input[1..])]);
    assert!(results(&token('y'), &input).is_empty());
}

#[test]
fn test_eof() {
    let input = ['x'];
    assert_eq!(results(&eof(), EMPTY), vec![((), EMPTY)]);
    assert!(results(&eof(), &input).is_empty());
}

#[test]
fn test_map_and_to() {
    let input = ['7'];
    let digit = satisfy(|c: &char| c.is_ascii_digit()).map(|c| c.to_digit(10));
    assert_eq!(results(&digit, &input), vec![(Some(7), EMPTY)]);
    assert_eq!(results(&token('7').to("seven"), &input), vec![("seven", EMPTY)]);
}

#[test]
fn test_parse_complete() {
    let input = ['a'];
    let parser = pure('-') | token('a');
    assert_eq!(parser.parse_complete(&input).collect::<Vec<_>>(), vec!['a']);
    assert_eq!(parser.first(&input), Some('a'));
    assert_eq!(token('b').first(&input), None);
}

#[test]
fn test_lazy_defers_construction() {
    use std::cell::Cell;

    let input = ['a'];
    let built = Rc::new(Cell::new(0));
    let counter = Rc::clone(&built);
    let parser = lazy(move || {
        counter.set(counter.get() + 1);
        token('a')
    });
    assert_eq!(built.get(), 0);
    assert_eq!(results(&parser, &input), vec![('a', EMPTY)]);
    assert_eq!(built.get(), 1);
}

#[test]
fn test_curry() {
    let add = curry2(|a: i32, b: i32| a + b);
    assert_eq!(add(1)(2), 3);
    let join = curry3(|a: char, b: char, c: char| format!("{a}{b}{c}"));
    assert_eq!(join('x')('y')('z'), "xyz");
}
