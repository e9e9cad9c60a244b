use std::iter;
use std::ops::{Add, BitOr};

use super::parser::{pure, Parser, Results};

impl<'a, T: 'a, A: 'a> Parser<'a, T, A> {
    /// Sequence: for every result of `self`, every result of `other` on its remainder.
    pub fn then<B: 'a>(self, other: Parser<'a, T, B>) -> Parser<'a, T, (A, B)>
    where
        A: Clone,
    {
        Parser::new(move |input| {
            let other = other.clone();
            Box::new(self.parse(input).flat_map(move |(a, rest)| {
                other
                    .parse(rest)
                    .map(move |(b, rest)| ((a.clone(), b), rest))
            }))
        })
    }

    /// Choice: all results of `self`, then all results of `other` on the same input.
    ///
    /// `other` does not run until the results of `self` are exhausted.
    pub fn or(self, other: Parser<'a, T, A>) -> Parser<'a, T, A> {
        Parser::new(move |input| {
            let other = other.clone();
            Box::new(
                self.parse(input)
                    .chain(iter::once_with(move || other.parse(input)).flatten()),
            )
        })
    }

    /// Applies every function produced by `self` to every argument produced
    /// by `argument` on the corresponding remainder.
    pub fn apply<B: 'a, C: 'a>(self, argument: Parser<'a, T, B>) -> Parser<'a, T, C>
    where
        A: Fn(B) -> C,
    {
        Parser::new(move |input| {
            let argument = argument.clone();
            Box::new(self.parse(input).flat_map(move |(f, rest)| {
                argument.parse(rest).map(move |(x, rest)| (f(x), rest))
            }))
        })
    }

    /// Keep right: both must match in sequence, only `other`'s result is kept.
    pub fn ignore_then<B: 'a>(self, other: Parser<'a, T, B>) -> Parser<'a, T, B> {
        pure(|_: A| |b: B| b).apply(self).apply(other)
    }

    /// Keep left: both must match in sequence, only `self`'s result is kept.
    pub fn then_ignore<B: 'a>(self, other: Parser<'a, T, B>) -> Parser<'a, T, A>
    where
        A: Clone,
    {
        pure(|a: A| move |_: B| a.clone()).apply(self).apply(other)
    }
}

/// Applicative application, `pf <*> pa`.
pub fn apply<'a, T, F, A, B>(pf: Parser<'a, T, F>, pa: Parser<'a, T, A>) -> Parser<'a, T, B>
where
    T: 'a,
    A: 'a,
    B: 'a,
    F: Fn(A) -> B + 'a,
{
    pf.apply(pa)
}

/// `(p then q)`, the sequencing of two parsers into a pair.
pub fn sequence<'a, T, A, B>(p: Parser<'a, T, A>, q: Parser<'a, T, B>) -> Parser<'a, T, (A, B)>
where
    T: 'a,
    A: Clone + 'a,
    B: 'a,
{
    p.then(q)
}

fn prepend<A: Clone>(head: A) -> impl Fn(Vec<A>) -> Vec<A> {
    move |tail| {
        let mut list = Vec::with_capacity(tail.len() + 1);
        list.push(head.clone());
        list.extend(tail);
        list
    }
}

/// Every number of repetitions of `parser`, longest first, down to the empty list.
///
/// On input that `parser` does not match this yields exactly `([], input)`.
/// Matches of `parser` that consume nothing are not repeated.
///
/// The search keeps its own stack of pending result sequences, one per
/// repetition, so its depth does not grow the call stack.
pub fn zero_or_more<'a, T, A>(parser: Parser<'a, T, A>) -> Parser<'a, T, Vec<A>>
where
    T: 'a,
    A: Clone + 'a,
{
    Parser::new(move |input| {
        let parser = parser.clone();
        let mut pending: Vec<(&'a [T], Results<'a, T, A>)> = vec![(input, parser.parse(input))];
        // `matched[i]` is the item that led from `pending[i]` to `pending[i + 1]`.
        let mut matched: Vec<A> = Vec::new();
        Box::new(iter::from_fn(move || loop {
            let (rest, results) = pending.last_mut()?;
            let rest = *rest;
            match results.next() {
                Some((item, next)) if next.len() < rest.len() => {
                    matched.push(item);
                    pending.push((next, parser.parse(next)));
                }
                Some(_) => continue,
                None => {
                    pending.pop();
                    let items = matched.clone();
                    matched.pop();
                    return Some((items, rest));
                }
            }
        }))
    })
}

/// Like `zero_or_more`, but fails unless `parser` matches at least once.
pub fn one_or_more<'a, T, A>(parser: Parser<'a, T, A>) -> Parser<'a, T, Vec<A>>
where
    T: 'a,
    A: Clone + 'a,
{
    pure(prepend::<A>)
        .apply(parser.clone())
        .apply(zero_or_more(parser))
}

/// `|` for choice: A | B -> A or B
impl<'a, T: 'a, A: 'a> BitOr<Parser<'a, T, A>> for Parser<'a, T, A> {
    type Output = Parser<'a, T, A>;

    fn bitor(self, rhs: Parser<'a, T, A>) -> Self::Output {
        self.or(rhs)
    }
}

/// `+` for sequence: A + B -> (A, B)
impl<'a, T: 'a, A: Clone + 'a, B: 'a> Add<Parser<'a, T, B>> for Parser<'a, T, A> {
    type Output = Parser<'a, T, (A, B)>;

    fn add(self, rhs: Parser<'a, T, B>) -> Self::Output {
        self.then(rhs)
    }
}

#[cfg(test)]
use super::parser::{curry2, fail, lazy, token};

#[cfg(test)]
fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[cfg(test)]
fn results<'a, R: 'a>(parser: &Parser<'a, char, R>, input: &'a [char]) -> Vec<(R, &'a [char])> {
    parser.parse(input).collect()
}

#[test]
fn test_alternation_identity() {
    let input = chars("aab");
    let p = token('a').to(1) | token('a').then(token('a')).to(2);
    let expected = vec![(1, &input[1..]), (2, &input[2..])];
    assert_eq!(results(&p, &input), expected);
    assert_eq!(results(&(p.clone() | fail()), &input), expected);
    assert_eq!(results(&(fail() | p.clone()), &input), expected);
}

#[test]
fn test_alternation_explores_both_branches() {
    let input = chars("ab");
    let p = token('a').then(token('b')).to("ab") | token('a').to("a");
    assert_eq!(results(&p, &input), vec![("ab", &input[2..]), ("a", &input[1..])]);
}

#[test]
fn test_alternation_is_lazy() {
    use std::cell::Cell;
    use std::rc::Rc;

    let input = chars("a");
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let p = token('a')
        | lazy(move || {
            counter.set(counter.get() + 1);
            token('a')
        });
    let mut parsed = p.parse(&input);
    assert_eq!(parsed.next(), Some(('a', &input[1..])));
    assert_eq!(runs.get(), 0);
    assert_eq!(parsed.next(), Some(('a', &input[1..])));
    assert_eq!(parsed.next(), None);
    assert_eq!(runs.get(), 1);
}

#[test]
fn test_sequence_fans_out() {
    let input = chars("abb");
    let p = token('a') + zero_or_more(token('b'));
    assert_eq!(
        results(&p, &input),
        vec![
            (('a', vec!['b', 'b']), &input[3..]),
            (('a', vec!['b']), &input[2..]),
            (('a', vec![]), &input[1..]),
        ]
    );
    assert!(results(&sequence(token('b'), token('a')), &input).is_empty());
}

#[test]
fn test_sequence_associativity() {
    let input = chars("abb");
    let p = token('a');
    let q = zero_or_more(token('b'));
    let r = zero_or_more(token('b'));
    let left = p
        .clone()
        .then(q.clone())
        .then(r.clone())
        .map(|((a, b), c)| (a, b, c));
    let right = p.then(q.then(r)).map(|(a, (b, c))| (a, b, c));
    let left = results(&left, &input);
    assert_eq!(left.len(), 6);
    assert_eq!(left, results(&right, &input));
}

#[test]
fn test_apply_identity_and_homomorphism() {
    let input = chars("ab");
    let p = token('a') | pure('z');
    let identity = pure(|x: char| x).apply(p.clone());
    assert_eq!(results(&identity, &input), results(&p, &input));

    let f = |x: i32| x * 2;
    let lhs = apply(pure(f), pure(21));
    let rhs = pure::<char, i32>(f(21));
    assert_eq!(results(&lhs, &input), results(&rhs, &input));
}

#[test]
fn test_apply_curried_constructor() {
    let input = chars("ab");
    let pair = pure(curry2(|a: char, b: char| format!("{a}{b}")))
        .apply(token('a'))
        .apply(token('b'));
    assert_eq!(results(&pair, &input), vec![("ab".to_string(), &input[2..])]);
}

#[test]
fn test_discard() {
    let input = chars("(x)");
    let parenthesized = token('(').ignore_then(token('x')).then_ignore(token(')'));
    assert_eq!(results(&parenthesized, &input), vec![('x', &input[3..])]);
    assert!(results(&parenthesized, &input[..2]).is_empty());
}

#[test]
fn test_zero_or_more() {
    let input = chars("aab");
    assert_eq!(
        results(&zero_or_more(token('a')), &input),
        vec![
            (vec!['a', 'a'], &input[2..]),
            (vec!['a'], &input[1..]),
            (vec![], &input[..]),
        ]
    );
}

#[test]
fn test_repetition_without_match() {
    let input = chars("xyz");
    assert_eq!(results(&zero_or_more(token('a')), &input), vec![(vec![], &input[..])]);
    assert!(results(&one_or_more(token('a')), &input).is_empty());
}

#[test]
fn test_one_or_more() {
    let input = chars("aab");
    assert_eq!(
        results(&one_or_more(token('a')), &input),
        vec![(vec!['a', 'a'], &input[2..]), (vec!['a'], &input[1..])]
    );
}

#[test]
fn test_long_repetition() {
    let input = vec!['a'; 100_000];
    let (items, rest) = zero_or_more(token('a')).parse(&input).next().unwrap();
    assert_eq!(items.len(), 100_000);
    assert!(rest.is_empty());
    assert_eq!(one_or_more(token('a')).first(&input).map(|items| items.len()), Some(100_000));
}

#[test]
fn test_repetition_skips_empty_matches() {
    let input = chars("aa");
    assert_eq!(results(&zero_or_more(pure('x')), &input), vec![(vec![], &input[..])]);
    assert_eq!(
        results(&zero_or_more(zero_or_more(token('a'))), &input),
        vec![
            (vec![vec!['a', 'a']], &input[2..]),
            (vec![vec!['a'], vec!['a']], &input[2..]),
            (vec![vec!['a']], &input[1..]),
            (vec![], &input[..]),
        ]
    );
}
