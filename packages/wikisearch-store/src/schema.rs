//! Content-store schema bootstrap.
//!
//! The wiki platform normally owns these tables; rendering them here keeps
//! test environments and self-contained deployments one call away from a
//! working store.

pub fn render_schema() -> &'static str {
	"\
CREATE TABLE IF NOT EXISTS page (
	page_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
	page_namespace BIGINT NOT NULL DEFAULT 0,
	page_title VARCHAR(255) NOT NULL,
	page_latest BIGINT UNSIGNED NOT NULL DEFAULT 0,
	page_created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
	page_touched TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
	PRIMARY KEY (page_id),
	UNIQUE KEY page_ns_title (page_namespace, page_title)
);

CREATE TABLE IF NOT EXISTS revision (
	rev_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
	rev_page BIGINT UNSIGNED NOT NULL,
	rev_text_id BIGINT UNSIGNED NOT NULL,
	rev_created TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
	PRIMARY KEY (rev_id),
	KEY rev_page (rev_page)
);

CREATE TABLE IF NOT EXISTS `text` (
	old_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
	old_text MEDIUMTEXT NOT NULL,
	PRIMARY KEY (old_id)
);

CREATE TABLE IF NOT EXISTS categorylinks (
	cl_from BIGINT UNSIGNED NOT NULL,
	cl_to VARCHAR(255) NOT NULL,
	PRIMARY KEY (cl_from, cl_to),
	KEY cl_to (cl_to)
);
"
}
