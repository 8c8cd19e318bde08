/// Leading-character policy for one destination scripting dialect: which
/// lines are comments, which enter command mode, and what keystroke submits
/// a command-mode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptDialect {
    pub name: &'static str,
    pub comment_leader: char,
    pub command_leader: char,
    pub execute_terminator: &'static str,
}

pub const VIM: ScriptDialect = ScriptDialect {
    name: "vim",
    comment_leader: '"',
    command_leader: ':',
    execute_terminator: "<CR>",
};

static DIALECTS: &[ScriptDialect] = &[VIM];

pub fn dialect_by_name(name: &str) -> Option<&'static ScriptDialect> {
    DIALECTS.iter().find(|dialect| dialect.name == name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementClass {
    Blank,
    Comment,
    Command,
    Normal,
}

impl ScriptDialect {
    /// Classify by the first non-whitespace character.
    pub fn classify(&self, line: &str) -> StatementClass {
        match line.trim_start().chars().next() {
            None => StatementClass::Blank,
            Some(ch) if ch == self.comment_leader => StatementClass::Comment,
            Some(ch) if ch == self.command_leader => StatementClass::Command,
            Some(_) => StatementClass::Normal,
        }
    }

    /// Apply the per-statement policy. `None` means the line is never
    /// dispatched. Command-mode lines get the execute terminator appended so
    /// feeding them both types and submits the command; lines that already
    /// carry the terminator are left alone.
    pub fn prepare(&self, line: &str) -> Option<String> {
        match self.classify(line) {
            StatementClass::Blank | StatementClass::Comment => None,
            StatementClass::Command => {
                if line.ends_with(self.execute_terminator) {
                    Some(line.to_string())
                } else {
                    Some(format!("{line}{}", self.execute_terminator))
                }
            }
            StatementClass::Normal => Some(line.to_string()),
        }
    }
}
