//! HTTP byte-range parsing and resolution.
//!
//! Only the single-range grammar is recognized: `bytes=start-end`,
//! `bytes=start-` and `bytes=-suffix`. Multi-range headers fail the parse
//! and are therefore served as unranged full responses; that is the one
//! documented behavior for them across the whole server.

/// A parsed (not yet validated) `Range` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start_inclusive: Option<u64>,
    end_inclusive: Option<u64>,
}

/// A range that resolved against a concrete object size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Serve the whole object.
    Full,
    /// Serve `start..=end`, both within `[0, total)`.
    Partial { start: u64, end: u64 },
}

/// The requested range lies entirely outside the object.
#[derive(Debug, PartialEq, Eq)]
pub struct Unsatisfiable;

impl ByteRange {
    pub fn new(start_inclusive: Option<u64>, end_inclusive: Option<u64>) -> ByteRange {
        ByteRange {
            start_inclusive,
            end_inclusive,
        }
    }

    pub fn parse<S: AsRef<str>>(s: S) -> Option<ByteRange> {
        let v = s.as_ref();
        if !v.starts_with("bytes=") {
            return None;
        }

        let v = &v[6..];
        if v.contains(',') {
            // Multi-range: not supported, treated as unranged by callers.
            return None;
        }
        let parts: Vec<&str> = v.split('-').collect();
        if parts.len() != 2 {
            return None;
        }

        let start = match parts[0] {
            "" => None,
            s => Some(s.parse::<u64>().ok()?),
        };
        let end = match parts[1] {
            "" => None,
            s => Some(s.parse::<u64>().ok()?),
        };
        if start.is_none() && end.is_none() {
            return None;
        }

        Some(ByteRange {
            start_inclusive: start,
            end_inclusive: end,
        })
    }

    /// Resolve against the object size.
    ///
    /// Ends past the object are clamped to `total - 1`. An inverted span
    /// (`start > end`) is ignored and served as a full response.
    pub fn resolve(self, total: u64) -> Result<Span, Unsatisfiable> {
        match (self.start_inclusive, self.end_inclusive) {
            (None, None) => Ok(Span::Full),
            (Some(start), end) => {
                if start >= total {
                    return Err(Unsatisfiable);
                }
                let end = end.map(|e| e.min(total - 1)).unwrap_or(total - 1);
                if end < start {
                    return Ok(Span::Full);
                }
                Ok(Span::Partial { start, end })
            }
            (None, Some(suffix)) => {
                if suffix == 0 || total == 0 {
                    return Err(Unsatisfiable);
                }
                Ok(Span::Partial {
                    start: total.saturating_sub(suffix),
                    end: total - 1,
                })
            }
        }
    }
}

impl Span {
    pub fn len(&self, total: u64) -> u64 {
        match self {
            Span::Full => total,
            Span::Partial { start, end } => end - start + 1,
        }
    }
}
