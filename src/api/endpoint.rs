pub type Endpoint = str;

/* Every request goes to the same CGI path, the body selects the data. */
pub const READ_VALUES: &Endpoint = "/lala.cgi";
