//! Per-resource list page configuration.

/// One table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
}

const fn column(field: &'static str, header: &'static str) -> Column {
    Column { field, header }
}

/// Configuration of one resource list page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    /// Route segment under `/api`, also the cache key.
    pub resource: &'static str,
    pub title: &'static str,
    /// Field naming a record in "Menyimpan ..." / "Menghapus ..." notifications.
    pub label_field: &'static str,
    /// Fields the search box matches against.
    pub search_fields: &'static [&'static str],
    pub columns: &'static [Column],
}

pub const INSTANSI: PageSpec = PageSpec {
    resource: "instansi",
    title: "Instansi",
    label_field: "nama",
    search_fields: &["nama"],
    columns: &[
        column("nama", "Nama"),
        column("alias", "Alias"),
        column("alamat", "Alamat"),
    ],
};

pub const JENIS: PageSpec = PageSpec {
    resource: "jenis",
    title: "Jenis",
    label_field: "nama",
    search_fields: &["nama"],
    columns: &[column("nama", "Nama")],
};

pub const KENDARAAN: PageSpec = PageSpec {
    resource: "kendaraan",
    title: "Kendaraan",
    label_field: "nopol",
    search_fields: &["nopol", "nama", "warna"],
    columns: &[
        column("nopol", "Nopol"),
        column("nama", "Nama"),
        column("warna", "Warna"),
        column("id_instansi", "Instansi"),
        column("id_jenis", "Jenis"),
        column("id_tahun", "Tahun"),
    ],
};

pub const KONDISI: PageSpec = PageSpec {
    resource: "kondisi",
    title: "Kondisi",
    label_field: "kondisi",
    search_fields: &["kondisi"],
    columns: &[column("kondisi", "Kondisi")],
};

pub const TAHUN: PageSpec = PageSpec {
    resource: "tahun",
    title: "Tahun",
    label_field: "tahun",
    search_fields: &["tahun"],
    columns: &[column("tahun", "Tahun")],
};

pub const USERS: PageSpec = PageSpec {
    resource: "users",
    title: "Users",
    label_field: "username",
    search_fields: &["name", "username"],
    columns: &[column("name", "Name"), column("username", "Username")],
};

/// Every page, in navigation order.
pub const PAGES: &[PageSpec] = &[INSTANSI, JENIS, KENDARAAN, KONDISI, TAHUN, USERS];

/// Look up a page by its resource segment.
pub fn page(resource: &str) -> Option<&'static PageSpec> {
    PAGES.iter().find(|p| p.resource == resource)
}
