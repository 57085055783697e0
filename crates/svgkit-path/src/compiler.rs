//! Path data compiler.
//!
//! Turns the `d` attribute mini-language into [`PathCommand`]s. A command
//! letter may be followed by any number of argument groups (the implicit
//! repeat rule); `M` continues as `L` after its first pair.

use crate::command::{PathCommand, Point};
use crate::number::{scan_number, skip_comma_whitespace, skip_whitespace};
use svgkit_common::excerpt;
use thiserror::Error;
use tracing::trace;

/// What went wrong while compiling path data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathSyntaxErrorKind {
    #[error("unknown path command {0:?}")]
    UnknownCommand(char),

    #[error("expected a number")]
    ExpectedNumber,

    #[error("expected an arc flag ('0' or '1')")]
    InvalidFlag,
}

/// A malformed `d` attribute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}: {excerpt}")]
pub struct PathSyntaxError {
    /// Byte offset into the path data.
    pub offset: usize,
    pub kind: PathSyntaxErrorKind,
    pub excerpt: String,
}

struct PathCompiler<'a> {
    data: &'a str,
    pos: usize,
    commands: Vec<PathCommand>,
}

impl<'a> PathCompiler<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            data,
            pos: 0,
            commands: Vec::new(),
        }
    }

    fn error(&self, offset: usize, kind: PathSyntaxErrorKind) -> PathSyntaxError {
        PathSyntaxError {
            offset,
            kind,
            excerpt: excerpt(self.data, offset),
        }
    }

    fn at_number(&self) -> bool {
        scan_number(self.data, self.pos).is_some()
    }

    fn number(&mut self) -> Result<f32, PathSyntaxError> {
        match scan_number(self.data, self.pos) {
            Some((value, end)) => {
                self.pos = skip_comma_whitespace(self.data, end);
                Ok(value)
            }
            None => Err(self.error(self.pos, PathSyntaxErrorKind::ExpectedNumber)),
        }
    }

    fn point(&mut self) -> Result<Point, PathSyntaxError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(x, y))
    }

    /// A single `0` or `1`; flags need no separator after them.
    fn flag(&mut self) -> Result<bool, PathSyntaxError> {
        let value = match self.data.as_bytes().get(self.pos) {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => return Err(self.error(self.pos, PathSyntaxErrorKind::InvalidFlag)),
        };
        self.pos = skip_comma_whitespace(self.data, self.pos + 1);
        Ok(value)
    }

    /// Parse one argument group with `group`, then more for as long as a
    /// number follows.
    fn repeat<F>(&mut self, mut group: F) -> Result<(), PathSyntaxError>
    where
        F: FnMut(&mut Self) -> Result<PathCommand, PathSyntaxError>,
    {
        loop {
            let command = group(self)?;
            self.commands.push(command);
            if !self.at_number() {
                return Ok(());
            }
        }
    }

    fn compile(mut self) -> Result<Vec<PathCommand>, PathSyntaxError> {
        self.pos = skip_whitespace(self.data, 0);

        while let Some(op) = self.data[self.pos..].chars().next() {
            let op_offset = self.pos;
            self.pos = skip_whitespace(self.data, self.pos + op.len_utf8());
            let relative = op.is_ascii_lowercase();

            match op.to_ascii_uppercase() {
                'M' => {
                    let to = self.point()?;
                    self.commands.push(PathCommand::MoveTo {
                        x: to.x,
                        y: to.y,
                        relative,
                    });
                    if self.at_number() {
                        self.repeat(|c| c.line_to(relative))?;
                    }
                }
                'L' => self.repeat(|c| c.line_to(relative))?,
                'H' => self.repeat(|c| {
                    Ok(PathCommand::LineTo {
                        x: Some(c.number()?),
                        y: None,
                        relative,
                    })
                })?,
                'V' => self.repeat(|c| {
                    Ok(PathCommand::LineTo {
                        x: None,
                        y: Some(c.number()?),
                        relative,
                    })
                })?,
                'C' => self.repeat(|c| {
                    Ok(PathCommand::CurveTo {
                        c1: Some(c.point()?),
                        c2: c.point()?,
                        end: c.point()?,
                        relative,
                    })
                })?,
                'S' => self.repeat(|c| {
                    Ok(PathCommand::CurveTo {
                        c1: None,
                        c2: c.point()?,
                        end: c.point()?,
                        relative,
                    })
                })?,
                'Q' => self.repeat(|c| {
                    Ok(PathCommand::QuadTo {
                        c1: Some(c.point()?),
                        end: c.point()?,
                        relative,
                    })
                })?,
                'T' => self.repeat(|c| {
                    Ok(PathCommand::QuadTo {
                        c1: None,
                        end: c.point()?,
                        relative,
                    })
                })?,
                'A' => self.repeat(|c| c.arc(relative))?,
                'Z' => {
                    self.commands.push(PathCommand::Close);
                    self.pos = skip_comma_whitespace(self.data, self.pos);
                }
                _ => return Err(self.error(op_offset, PathSyntaxErrorKind::UnknownCommand(op))),
            }
        }

        Ok(self.commands)
    }

    fn line_to(&mut self, relative: bool) -> Result<PathCommand, PathSyntaxError> {
        let to = self.point()?;
        Ok(PathCommand::LineTo {
            x: Some(to.x),
            y: Some(to.y),
            relative,
        })
    }

    fn arc(&mut self, relative: bool) -> Result<PathCommand, PathSyntaxError> {
        let rx = self.number()?;
        let ry = self.number()?;
        let rotation = self.number()?;
        let large_arc = self.flag()?;
        let sweep = self.flag()?;
        let to = self.point()?;

        // A flat ellipse is a straight line to the end point.
        if rx == 0.0 || ry == 0.0 {
            return Ok(PathCommand::LineTo {
                x: Some(to.x),
                y: Some(to.y),
                relative,
            });
        }
        Ok(PathCommand::ArcTo {
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            x: to.x,
            y: to.y,
            relative,
        })
    }
}

/// Compile path data into commands. Empty input yields no commands.
pub fn compile_path(d: &str) -> Result<Vec<PathCommand>, PathSyntaxError> {
    let commands = PathCompiler::new(d).compile()?;
    trace!(command_count = commands.len(), "Compiled path data");
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x: Option<f32>, y: Option<f32>) -> PathCommand {
        PathCommand::LineTo {
            x,
            y,
            relative: false,
        }
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(compile_path("").unwrap(), vec![]);
        assert_eq!(compile_path("  \n").unwrap(), vec![]);
    }

    #[test]
    fn test_horizontal_and_vertical_leave_axis_unset() {
        let commands = compile_path("M10 10 H 90 V 90 H 10 Z").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::move_to(10.0, 10.0),
                line(Some(90.0), None),
                line(None, Some(90.0)),
                line(Some(10.0), None),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_implicit_repeat() {
        let commands = compile_path("L 1 2 3 4 5 6").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::line_to(1.0, 2.0),
                PathCommand::line_to(3.0, 4.0),
                PathCommand::line_to(5.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_move_continues_as_line() {
        let commands = compile_path("m1 2 3 4").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo {
                    x: 1.0,
                    y: 2.0,
                    relative: true
                },
                PathCommand::LineTo {
                    x: Some(3.0),
                    y: Some(4.0),
                    relative: true
                },
            ]
        );
    }

    #[test]
    fn test_compact_separators() {
        let commands = compile_path("M10-5L.5.5,1e1-2z").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::move_to(10.0, -5.0),
                PathCommand::line_to(0.5, 0.5),
                PathCommand::line_to(10.0, -2.0),
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_smooth_commands_leave_control_unset() {
        let commands = compile_path("S 30,10 40,20 T 50 60").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::CurveTo {
                    c1: None,
                    c2: Point::new(30.0, 10.0),
                    end: Point::new(40.0, 20.0),
                    relative: false
                },
                PathCommand::QuadTo {
                    c1: None,
                    end: Point::new(50.0, 60.0),
                    relative: false
                },
            ]
        );
    }

    #[test]
    fn test_cubic_and_quadratic() {
        let commands = compile_path("c1 2 3 4 5 6 q7 8 9 10").unwrap();
        assert_eq!(
            commands[0],
            PathCommand::CurveTo {
                c1: Some(Point::new(1.0, 2.0)),
                c2: Point::new(3.0, 4.0),
                end: Point::new(5.0, 6.0),
                relative: true
            }
        );
        assert_eq!(
            commands[1],
            PathCommand::QuadTo {
                c1: Some(Point::new(7.0, 8.0)),
                end: Point::new(9.0, 10.0),
                relative: true
            }
        );
    }

    #[test]
    fn test_arc_with_zero_radius_is_line() {
        let commands = compile_path("A 0 5 0 0 1 20 20").unwrap();
        assert_eq!(commands, vec![PathCommand::line_to(20.0, 20.0)]);

        let commands = compile_path("a 5 0 0 1 0 20 20").unwrap();
        assert_eq!(
            commands,
            vec![PathCommand::LineTo {
                x: Some(20.0),
                y: Some(20.0),
                relative: true
            }]
        );
    }

    #[test]
    fn test_arc_flags() {
        let commands = compile_path("A10,10 0 0,1 100,10").unwrap();
        assert_eq!(commands, vec![PathCommand::arc_to(10.0, 10.0, false, true, 100.0, 10.0)]);

        // Flags need no separator.
        let commands = compile_path("a5 5 30 1020 0").unwrap();
        assert_eq!(
            commands,
            vec![PathCommand::ArcTo {
                rx: 5.0,
                ry: 5.0,
                rotation: 30.0,
                large_arc: true,
                sweep: false,
                x: 20.0,
                y: 0.0,
                relative: true
            }]
        );
    }

    #[test]
    fn test_invalid_flag() {
        let err = compile_path("A 5 5 0 2 1 10 10").unwrap_err();
        assert_eq!(err.kind, PathSyntaxErrorKind::InvalidFlag);
        assert_eq!(err.offset, 8);
    }

    #[test]
    fn test_unknown_command() {
        let err = compile_path("M 0 0 X 1 1").unwrap_err();
        assert_eq!(err.kind, PathSyntaxErrorKind::UnknownCommand('X'));
        assert_eq!(err.offset, 6);
        assert_eq!(err.excerpt, "M 0 0 |X 1 1");
    }

    #[test]
    fn test_missing_number() {
        let err = compile_path("M 10").unwrap_err();
        assert_eq!(err.kind, PathSyntaxErrorKind::ExpectedNumber);
        assert_eq!(err.offset, 4);

        let err = compile_path("L 1 -").unwrap_err();
        assert_eq!(err.kind, PathSyntaxErrorKind::ExpectedNumber);
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn test_lowercase_close() {
        let commands = compile_path("M0 0 L1 1 z M2 2").unwrap();
        assert_eq!(commands[2], PathCommand::Close);
        assert_eq!(commands[3], PathCommand::move_to(2.0, 2.0));
    }
}
