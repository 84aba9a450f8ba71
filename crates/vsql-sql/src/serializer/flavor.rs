use super::Serializer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
    Oracle,
}

impl Flavor {
    /// Whether a condition can be used where a value is expected. Oracle
    /// needs a `CASE` expression to turn a condition into 1/0, and a 1/0
    /// value into a condition.
    pub(super) fn conditions_are_values(self) -> bool {
        !matches!(self, Flavor::Oracle)
    }

    /// Name of the character length function.
    pub(super) fn length(self) -> &'static str {
        match self {
            Flavor::Mysql => "CHAR_LENGTH",
            _ => "LENGTH",
        }
    }

    pub(super) fn greatest(self) -> &'static str {
        match self {
            Flavor::Sqlite => "MAX",
            _ => "GREATEST",
        }
    }
}

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }

    pub fn oracle() -> Serializer {
        Serializer {
            flavor: Flavor::Oracle,
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.flavor == Flavor::Sqlite
    }

    pub fn is_postgresql(&self) -> bool {
        self.flavor == Flavor::Postgresql
    }

    pub fn is_mysql(&self) -> bool {
        self.flavor == Flavor::Mysql
    }

    pub fn is_oracle(&self) -> bool {
        self.flavor == Flavor::Oracle
    }
}
