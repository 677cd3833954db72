use std::fmt;

/// Permission set carried by a service SAS token.
///
/// Azure requires permission letters in the canonical `racwdxyltmeop` order;
/// a token with out-of-order letters is rejected at authorization time, so
/// the Display impl is the only way these are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SasPermissions {
    /// Read blob content, properties and metadata.
    pub read: bool,
    /// Write blob content, properties and metadata.
    pub write: bool,
    /// Delete blobs.
    pub delete: bool,
    /// List blobs in the container.
    pub list: bool,
}

impl SasPermissions {
    /// Permissions for a read-only token.
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Default::default()
        }
    }
}

impl fmt::Display for SasPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.read {
            write!(f, "r")?;
        }
        if self.write {
            write!(f, "w")?;
        }
        if self.delete {
            write!(f, "d")?;
        }
        if self.list {
            write!(f, "l")?;
        }
        Ok(())
    }
}

/// Options for a container-scoped SAS token.
///
/// Read access is always granted. Write access implies delete access, the
/// way the container tokens of this tool have historically been shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerSasOptions {
    /// Grant write and delete permissions.
    pub write_access: bool,
    /// Grant list permission.
    pub list_access: bool,
}

impl Default for ContainerSasOptions {
    fn default() -> Self {
        Self {
            write_access: false,
            list_access: true,
        }
    }
}

impl ContainerSasOptions {
    /// Derive the permission set for a container token.
    pub fn permissions(&self) -> SasPermissions {
        SasPermissions {
            read: true,
            write: self.write_access,
            delete: self.write_access,
            list: self.list_access,
        }
    }
}
