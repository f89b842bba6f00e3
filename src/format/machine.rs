/// Source machine descriptors stored in the archive header
///
/// These fields describe the environment an archive was created on. This
/// library writes fixed defaults; the conversions exist so parsed headers
/// can be displayed.

/// CPU of the machine that created the archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MachineCpu {
    /// Motorola 68000
    #[default]
    M68000,
    /// Motorola 68010
    M68010,
    /// Motorola 68020
    M68020,
    /// Motorola 68030
    M68030,
    /// Motorola 68040
    M68040,
    /// Motorola 68060
    M68060,
    /// Intel 8086
    I8086,
    /// Intel 8088
    I8088,
    /// Unknown CPU value
    Unknown(u16),
}

impl From<u16> for MachineCpu {
    fn from(value: u16) -> Self {
        match value {
            0 => MachineCpu::M68000,
            1 => MachineCpu::M68010,
            2 => MachineCpu::M68020,
            3 => MachineCpu::M68030,
            4 => MachineCpu::M68040,
            5 => MachineCpu::M68060,
            6 => MachineCpu::I8086,
            7 => MachineCpu::I8088,
            other => MachineCpu::Unknown(other),
        }
    }
}

impl From<MachineCpu> for u16 {
    fn from(cpu: MachineCpu) -> Self {
        match cpu {
            MachineCpu::M68000 => 0,
            MachineCpu::M68010 => 1,
            MachineCpu::M68020 => 2,
            MachineCpu::M68030 => 3,
            MachineCpu::M68040 => 4,
            MachineCpu::M68060 => 5,
            MachineCpu::I8086 => 6,
            MachineCpu::I8088 => 7,
            MachineCpu::Unknown(other) => other,
        }
    }
}

/// Floating point coprocessor of the creating machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CpuCopro {
    /// No coprocessor
    #[default]
    None,
    /// Motorola 68881
    M68881,
    /// Motorola 68882
    M68882,
    /// Unknown coprocessor value
    Unknown(u16),
}

impl From<u16> for CpuCopro {
    fn from(value: u16) -> Self {
        match value {
            0 => CpuCopro::None,
            1 => CpuCopro::M68881,
            2 => CpuCopro::M68882,
            other => CpuCopro::Unknown(other),
        }
    }
}

impl From<CpuCopro> for u16 {
    fn from(copro: CpuCopro) -> Self {
        match copro {
            CpuCopro::None => 0,
            CpuCopro::M68881 => 1,
            CpuCopro::M68882 => 2,
            CpuCopro::Unknown(other) => other,
        }
    }
}

/// Kind of machine that created the archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MachineType {
    /// Not recorded
    #[default]
    Unknown,
    /// Commodore Amiga
    Amiga,
    /// PC clone
    PcClone,
    /// Atari ST
    Atari,
    /// Apple Macintosh
    Macintosh,
    /// Unknown machine value
    Other(u16),
}

impl From<u16> for MachineType {
    fn from(value: u16) -> Self {
        match value {
            0 => MachineType::Unknown,
            1 => MachineType::Amiga,
            2 => MachineType::PcClone,
            3 => MachineType::Atari,
            4 => MachineType::Macintosh,
            other => MachineType::Other(other),
        }
    }
}

impl From<MachineType> for u16 {
    fn from(machine: MachineType) -> Self {
        match machine {
            MachineType::Unknown => 0,
            MachineType::Amiga => 1,
            MachineType::PcClone => 2,
            MachineType::Atari => 3,
            MachineType::Macintosh => 4,
            MachineType::Other(other) => other,
        }
    }
}

/// Filesystem of the source diskette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisketteType {
    /// Not recorded
    #[default]
    Unknown,
    /// AmigaOS 1.x OFS
    AmigaOs1Ofs,
    /// AmigaOS 1.x FFS
    AmigaOs1Ffs,
    /// AmigaOS 3.x international
    AmigaOs3Intl,
    /// AmigaOS 3.x FFS international
    AmigaOs3FfsIntl,
    /// AmigaOS 3.x directory cache
    AmigaOs3DirCache,
    /// AmigaOS 3.x FFS directory cache
    AmigaOs3FfsDirCache,
    /// File Masher System archive
    FileMasher,
    /// Unknown diskette value
    Other(u16),
}

impl From<u16> for DisketteType {
    fn from(value: u16) -> Self {
        match value {
            0 => DisketteType::Unknown,
            1 => DisketteType::AmigaOs1Ofs,
            2 => DisketteType::AmigaOs1Ffs,
            3 => DisketteType::AmigaOs3Intl,
            4 => DisketteType::AmigaOs3FfsIntl,
            5 => DisketteType::AmigaOs3DirCache,
            6 => DisketteType::AmigaOs3FfsDirCache,
            7 => DisketteType::FileMasher,
            other => DisketteType::Other(other),
        }
    }
}

impl From<DisketteType> for u16 {
    fn from(diskette: DisketteType) -> Self {
        match diskette {
            DisketteType::Unknown => 0,
            DisketteType::AmigaOs1Ofs => 1,
            DisketteType::AmigaOs1Ffs => 2,
            DisketteType::AmigaOs3Intl => 3,
            DisketteType::AmigaOs3FfsIntl => 4,
            DisketteType::AmigaOs3DirCache => 5,
            DisketteType::AmigaOs3FfsDirCache => 6,
            DisketteType::FileMasher => 7,
            DisketteType::Other(other) => other,
        }
    }
}
