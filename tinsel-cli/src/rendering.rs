// tinsel-cli/src/rendering.rs
use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use pulldown_cmark_to_cmark::cmark;
use std::io::{self, Write};
use syntect::{
    easy::HighlightLines,
    highlighting::{Style, Theme, ThemeSet},
    parsing::SyntaxSet,
    util::LinesWithEndings,
};
use termimad::{
    crossterm::style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    MadSkin,
};

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

const CODE_THEME: &str = "base16-ocean.dark";

fn create_skin() -> MadSkin {
    let mut skin = MadSkin::default();
    skin.inline_code.set_fg(Color::Cyan);
    skin.inline_code.set_bg(Color::Reset);
    skin.code_block.set_fg(Color::Reset);
    skin.code_block.set_bg(Color::Reset);
    skin
}

fn highlight_code<W: Write>(
    writer: &mut W,
    code: &str,
    language: Option<&str>,
    theme: &Theme,
) -> Result<(), io::Error> {
    let lower_lang = language.map(|l| l.to_lowercase());
    let syntax = lower_lang
        .as_deref()
        .and_then(|token| SYNTAX_SET.find_syntax_by_token(token))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

    let mut highlighter = HighlightLines::new(syntax, theme);

    for line in LinesWithEndings::from(code) {
        let ranges: Vec<(Style, &str)> = highlighter
            .highlight_line(line, &SYNTAX_SET)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        for (style, content) in ranges {
            let fg = style.foreground;
            if fg.a > 0 {
                write!(
                    writer,
                    "{}",
                    SetForegroundColor(Color::Rgb {
                        r: fg.r,
                        g: fg.g,
                        b: fg.b
                    })
                )?;
            }
            write!(writer, "{}", content)?;
            write!(writer, "{}", ResetColor)?;
        }
    }
    write!(writer, "{}", SetAttribute(Attribute::Reset))?;
    Ok(())
}

// Buffered non-code events are reconstructed as markdown and handed to
// termimad; code blocks bypass the skin and go through syntect instead.
fn flush_markdown_buffer<W: Write>(
    events: &mut Vec<Event<'_>>,
    skin: &MadSkin,
    writer: &mut W,
) -> Result<(), io::Error> {
    if events.is_empty() {
        return Ok(());
    }
    let mut md_string = String::new();
    cmark(events.iter(), &mut md_string).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Markdown generation error: {}", e),
        )
    })?;
    skin.write_text_on(writer, &md_string).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Termimad rendering error: {}", e),
        )
    })?;
    events.clear();
    Ok(())
}

/// Prints markdown text to stdout with highlighted fenced code blocks.
pub fn print_formatted(markdown_text: &str) -> Result<()> {
    let skin = create_skin();
    let theme = &THEME_SET.themes[CODE_THEME];
    let mut stdout = io::stdout().lock();

    let mut event_buffer: Vec<Event<'_>> = Vec::new();
    let mut code_buffer = String::new();
    let mut current_language: Option<String> = None;
    let mut in_code_block = false;

    for event in Parser::new_ext(markdown_text, Options::empty()) {
        match &event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) => {
                flush_markdown_buffer(&mut event_buffer, &skin, &mut stdout)?;
                in_code_block = true;
                current_language = Some(lang.to_string());
                code_buffer.clear();
                writeln!(stdout)?;
            }
            Event::End(TagEnd::CodeBlock) => {
                if in_code_block {
                    highlight_code(&mut stdout, &code_buffer, current_language.as_deref(), theme)?;
                    in_code_block = false;
                    code_buffer.clear();
                    current_language = None;
                    writeln!(stdout)?;
                }
            }
            Event::Text(text) if in_code_block => {
                code_buffer.push_str(text);
            }
            _ => {
                if !in_code_block {
                    event_buffer.push(event.clone());
                }
            }
        }
    }

    flush_markdown_buffer(&mut event_buffer, &skin, &mut stdout)?;
    Ok(())
}
